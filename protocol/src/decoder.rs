//! Decoder for agar.io backend messages.
//!
//! One complete, transport-framed buffer in, one typed [`Message`] out. The
//! decoder holds no state between calls; a message either decodes fully or
//! is rejected wholesale.

use crate::cursor::ByteCursor;
use crate::error::DecodeError;
use crate::message::{tags, Consumption, Entity, LeaderBoardEntry, Message};

/// Decodes one complete message buffer.
///
/// # Arguments
/// * `buf` - One whole message as framed by the transport, tag byte first
///
/// # Returns
/// The decoded message, or a [`DecodeError::MalformedMessage`] naming the
/// tag and the offset where decoding stopped. Unrecognized tags are not an
/// error; they decode to [`Message::Unknown`].
pub fn decode(buf: &[u8]) -> Result<Message, DecodeError> {
    let mut cursor = ByteCursor::new(buf);
    let tag = cursor.read_u8()?;

    let result = match tag {
        tags::UPDATES => read_updates(&mut cursor),
        tags::SCREEN_POSITION => read_screen_position(&mut cursor),
        tags::RESET => Ok(Message::Reset),
        tags::USER_ID => read_user_id(&mut cursor),
        tags::LEADER_BOARD => read_leader_board(&mut cursor),
        tags::UNCLASSIFIED => read_unclassified(&mut cursor),
        tags::BOARD_SIZE => read_board_size(&mut cursor),
        other => Ok(Message::Unknown {
            tag: other,
            data: cursor.slice_remaining().to_vec(),
        }),
    };

    result.map_err(|source| DecodeError::MalformedMessage {
        tag,
        offset: source.offset(),
        source: Box::new(source),
    })
}

/// Updates payload, in fixed order: consumptions (u16-counted), entities
/// (sentinel-terminated), destructions (u32-counted). The 16/32-bit count
/// asymmetry is what the server actually sends.
fn read_updates(cursor: &mut ByteCursor) -> Result<Message, DecodeError> {
    let consumption_count = cursor.read_u16_le()?;
    let mut consumptions = Vec::with_capacity(consumption_count as usize);
    for _ in 0..consumption_count {
        consumptions.push(Consumption {
            consumer_id: cursor.read_u32_le()?,
            consumed_id: cursor.read_u32_le()?,
        });
    }

    let mut entities = Vec::new();
    while let Some(entity) = read_entity(cursor)? {
        entities.push(entity);
    }

    let destruction_count = cursor.read_u32_le()?;
    let mut destructions = Vec::with_capacity(destruction_count.min(4096) as usize);
    for _ in 0..destruction_count {
        destructions.push(cursor.read_u32_le()?);
    }

    Ok(Message::Updates {
        consumptions,
        entities,
        destructions,
    })
}

/// Reads one entity entry. An id of 0 terminates the entity list; the
/// marker itself carries no data and is not returned.
fn read_entity(cursor: &mut ByteCursor) -> Result<Option<Entity>, DecodeError> {
    let id = cursor.read_u32_le()?;
    if id == 0 {
        return Ok(None);
    }

    let x = cursor.read_i16_le()?;
    let y = cursor.read_i16_le()?;
    let size = cursor.read_i16_le()?;
    let color = read_color(cursor)?;
    let flags = cursor.read_u8()?;
    let name = read_name(cursor)?;

    Ok(Some(Entity {
        id,
        x,
        y,
        size,
        color,
        is_virus: flags & 1 != 0,
        is_agitated: flags & 16 != 0,
        name,
    }))
}

/// Three r/g/b bytes packed into a lowercase `#rrggbb` string.
fn read_color(cursor: &mut ByteCursor) -> Result<String, DecodeError> {
    let r = cursor.read_u8()? as u32;
    let g = cursor.read_u8()? as u32;
    let b = cursor.read_u8()? as u32;
    Ok(format!("#{:06x}", (r << 16) | (g << 8) | b))
}

/// Null-terminated UTF-16LE string. The terminator is consumed but not part
/// of the result; a buffer ending before the terminator is an error.
fn read_name(cursor: &mut ByteCursor) -> Result<String, DecodeError> {
    let mut units = Vec::new();
    loop {
        let unit = cursor.read_u16_le()?;
        if unit == 0 {
            break;
        }
        units.push(unit);
    }
    Ok(String::from_utf16_lossy(&units))
}

fn read_user_id(cursor: &mut ByteCursor) -> Result<Message, DecodeError> {
    Ok(Message::UserId {
        id: cursor.read_u32_le()?,
    })
}

fn read_leader_board(cursor: &mut ByteCursor) -> Result<Message, DecodeError> {
    let count = cursor.read_u32_le()?;
    let mut entries = Vec::with_capacity(count.min(4096) as usize);
    for _ in 0..count {
        entries.push(LeaderBoardEntry {
            id: cursor.read_u32_le()?,
            name: read_name(cursor)?,
        });
    }
    Ok(Message::LeaderBoard { entries })
}

fn read_board_size(cursor: &mut ByteCursor) -> Result<Message, DecodeError> {
    Ok(Message::BoardSize {
        min_x: cursor.read_f64_le()?,
        min_y: cursor.read_f64_le()?,
        max_x: cursor.read_f64_le()?,
        max_y: cursor.read_f64_le()?,
    })
}

fn read_screen_position(cursor: &mut ByteCursor) -> Result<Message, DecodeError> {
    Ok(Message::ScreenPosition {
        x: cursor.read_f32_le()?,
        y: cursor.read_f32_le()?,
        z: cursor.read_f32_le()?,
    })
}

/// Length-prefixed f32 array. What these values mean is not known.
fn read_unclassified(cursor: &mut ByteCursor) -> Result<Message, DecodeError> {
    let count = cursor.read_u32_le()?;
    let mut values = Vec::with_capacity(count.min(4096) as usize);
    for _ in 0..count {
        values.push(cursor.read_f32_le()?);
    }
    Ok(Message::Unclassified { values })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Builds message buffers the way the server lays them out.
    struct Writer(Vec<u8>);

    impl Writer {
        fn new(tag: u8) -> Self {
            Writer(vec![tag])
        }

        fn u8(mut self, v: u8) -> Self {
            self.0.push(v);
            self
        }

        fn u16(mut self, v: u16) -> Self {
            self.0.extend_from_slice(&v.to_le_bytes());
            self
        }

        fn i16(mut self, v: i16) -> Self {
            self.0.extend_from_slice(&v.to_le_bytes());
            self
        }

        fn u32(mut self, v: u32) -> Self {
            self.0.extend_from_slice(&v.to_le_bytes());
            self
        }

        fn f32(mut self, v: f32) -> Self {
            self.0.extend_from_slice(&v.to_le_bytes());
            self
        }

        fn f64(mut self, v: f64) -> Self {
            self.0.extend_from_slice(&v.to_le_bytes());
            self
        }

        /// UTF-16LE code units plus the null terminator.
        fn name(mut self, s: &str) -> Self {
            for unit in s.encode_utf16() {
                self.0.extend_from_slice(&unit.to_le_bytes());
            }
            self.0.extend_from_slice(&0u16.to_le_bytes());
            self
        }

        /// Full entity entry: id, x, y, size, rgb, flags, name.
        fn entity(self, id: u32, x: i16, y: i16, size: i16, rgb: [u8; 3], flags: u8, name: &str) -> Self {
            self.u32(id)
                .i16(x)
                .i16(y)
                .i16(size)
                .u8(rgb[0])
                .u8(rgb[1])
                .u8(rgb[2])
                .u8(flags)
                .name(name)
        }
    }

    #[test]
    fn board_size_round_trips_doubles() {
        let buf = Writer::new(tags::BOARD_SIZE)
            .f64(0.0)
            .f64(0.0)
            .f64(11180.34)
            .f64(11180.34)
            .0;
        assert_eq!(buf.len(), 33);

        let message = decode(&buf).unwrap();
        assert_eq!(
            message,
            Message::BoardSize {
                min_x: 0.0,
                min_y: 0.0,
                max_x: 11180.34,
                max_y: 11180.34,
            }
        );
    }

    #[test]
    fn color_is_zero_padded_lowercase_hex() {
        let mut cursor = ByteCursor::new(&[0, 0, 1]);
        assert_eq!(read_color(&mut cursor).unwrap(), "#000001");

        let mut cursor = ByteCursor::new(&[0, 0, 0]);
        assert_eq!(read_color(&mut cursor).unwrap(), "#000000");

        let mut cursor = ByteCursor::new(&[255, 0, 0]);
        assert_eq!(read_color(&mut cursor).unwrap(), "#ff0000");
    }

    #[test]
    fn name_stops_at_terminator() {
        // "Hi" then the null unit.
        let buf = [72, 0, 105, 0, 0, 0];
        let mut cursor = ByteCursor::new(&buf);
        assert_eq!(read_name(&mut cursor).unwrap(), "Hi");
        assert_eq!(cursor.remaining(), 0);
    }

    #[test]
    fn empty_name_is_just_the_terminator() {
        let buf = [0, 0];
        let mut cursor = ByteCursor::new(&buf);
        assert_eq!(read_name(&mut cursor).unwrap(), "");
    }

    #[test]
    fn unterminated_name_is_out_of_bounds() {
        let buf = [72, 0, 105, 0];
        let mut cursor = ByteCursor::new(&buf);
        assert!(matches!(
            read_name(&mut cursor),
            Err(DecodeError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn flag_bits_map_to_virus_and_agitated() {
        // 0b0001_0001: virus and agitated both set.
        let buf = Writer::new(tags::UPDATES)
            .u16(0)
            .entity(5, 0, 0, 10, [0, 0, 0], 17, "")
            .u32(0) // entity list terminator
            .u32(0) // destruction count
            .0;
        match decode(&buf).unwrap() {
            Message::Updates { entities, .. } => {
                assert!(entities[0].is_virus);
                assert!(entities[0].is_agitated);
            }
            other => panic!("expected updates, got {:?}", other),
        }

        // 0b0000_0010: a reserved bit, both flags clear.
        let buf = Writer::new(tags::UPDATES)
            .u16(0)
            .entity(5, 0, 0, 10, [0, 0, 0], 2, "")
            .u32(0)
            .u32(0)
            .0;
        match decode(&buf).unwrap() {
            Message::Updates { entities, .. } => {
                assert!(!entities[0].is_virus);
                assert!(!entities[0].is_agitated);
            }
            other => panic!("expected updates, got {:?}", other),
        }
    }

    #[test]
    fn updates_with_one_entity() {
        let buf = Writer::new(tags::UPDATES)
            .u16(0)
            .entity(5, -20, 35, 100, [18, 52, 86], 0, "blob")
            .u32(0)
            .u32(0)
            .0;

        let message = decode(&buf).unwrap();
        assert_eq!(
            message,
            Message::Updates {
                consumptions: vec![],
                entities: vec![Entity {
                    id: 5,
                    x: -20,
                    y: 35,
                    size: 100,
                    color: "#123456".to_string(),
                    is_virus: false,
                    is_agitated: false,
                    name: "blob".to_string(),
                }],
                destructions: vec![],
            }
        );
    }

    #[test]
    fn updates_reads_all_three_sections() {
        let buf = Writer::new(tags::UPDATES)
            .u16(2)
            .u32(7)
            .u32(8) // 7 consumed 8
            .u32(7)
            .u32(9) // 7 consumed 9
            .entity(7, 1, 2, 30, [255, 255, 255], 1, "big")
            .entity(11, -5, -6, 12, [0, 128, 0], 16, "")
            .u32(0)
            .u32(2)
            .u32(100)
            .u32(101)
            .0;

        match decode(&buf).unwrap() {
            Message::Updates {
                consumptions,
                entities,
                destructions,
            } => {
                assert_eq!(
                    consumptions,
                    vec![
                        Consumption {
                            consumer_id: 7,
                            consumed_id: 8
                        },
                        Consumption {
                            consumer_id: 7,
                            consumed_id: 9
                        },
                    ]
                );
                assert_eq!(entities.len(), 2);
                assert!(entities.iter().all(|e| e.id != 0));
                assert!(entities[0].is_virus);
                assert_eq!(entities[1].color, "#008000");
                assert!(entities[1].is_agitated);
                assert_eq!(destructions, vec![100, 101]);
            }
            other => panic!("expected updates, got {:?}", other),
        }
    }

    #[test]
    fn updates_with_empty_sections() {
        let buf = Writer::new(tags::UPDATES).u16(0).u32(0).u32(0).0;
        assert_eq!(
            decode(&buf).unwrap(),
            Message::Updates {
                consumptions: vec![],
                entities: vec![],
                destructions: vec![],
            }
        );
    }

    #[test]
    fn truncated_entity_is_malformed_never_partial() {
        // Tag, zero consumptions, then an entity id with no fields behind it.
        let buf = Writer::new(tags::UPDATES).u16(0).u32(5).i16(40).0;

        let err = decode(&buf).unwrap_err();
        match err {
            DecodeError::MalformedMessage { tag, offset, .. } => {
                assert_eq!(tag, tags::UPDATES);
                // Failed reading y at the end of the buffer.
                assert_eq!(offset, buf.len());
            }
            other => panic!("expected malformed message, got {:?}", other),
        }
    }

    #[test]
    fn truncated_destruction_list_is_malformed() {
        let buf = Writer::new(tags::UPDATES)
            .u16(0)
            .u32(0) // entity terminator
            .u32(3) // claims three destructions
            .u32(42)
            .0;
        assert!(matches!(
            decode(&buf),
            Err(DecodeError::MalformedMessage {
                tag: tags::UPDATES,
                ..
            })
        ));
    }

    #[test]
    fn truncated_fixed_width_payloads_are_malformed() {
        // A short UserId still names its tag; only a missing tag byte may
        // surface as a bare bounds error.
        let err = decode(&[32, 1, 0]).unwrap_err();
        match err {
            DecodeError::MalformedMessage { tag, offset, source } => {
                assert_eq!(tag, tags::USER_ID);
                assert_eq!(offset, 1);
                assert!(matches!(
                    *source,
                    DecodeError::OutOfBounds {
                        offset: 1,
                        wanted: 4,
                        remaining: 2,
                    }
                ));
            }
            other => panic!("expected malformed message, got {:?}", other),
        }

        // Same for the other fixed-width payloads.
        let buf = Writer::new(tags::BOARD_SIZE).f64(0.0).f64(0.0).f64(1.0).0;
        assert!(matches!(
            decode(&buf),
            Err(DecodeError::MalformedMessage {
                tag: tags::BOARD_SIZE,
                ..
            })
        ));

        let buf = Writer::new(tags::SCREEN_POSITION).f32(1.0).0;
        assert!(matches!(
            decode(&buf),
            Err(DecodeError::MalformedMessage {
                tag: tags::SCREEN_POSITION,
                ..
            })
        ));
    }

    #[test]
    fn user_id_and_screen_position() {
        let buf = Writer::new(tags::USER_ID).u32(3_141_592).0;
        assert_eq!(decode(&buf).unwrap(), Message::UserId { id: 3_141_592 });

        let buf = Writer::new(tags::SCREEN_POSITION).f32(1.5).f32(-2.5).f32(0.25).0;
        assert_eq!(
            decode(&buf).unwrap(),
            Message::ScreenPosition {
                x: 1.5,
                y: -2.5,
                z: 0.25,
            }
        );
    }

    #[test]
    fn reset_has_no_payload() {
        assert_eq!(decode(&[tags::RESET]).unwrap(), Message::Reset);
    }

    #[test]
    fn leader_board_entries_in_order() {
        let buf = Writer::new(tags::LEADER_BOARD)
            .u32(2)
            .u32(10)
            .name("alpha")
            .u32(20)
            .name("beta")
            .0;
        assert_eq!(
            decode(&buf).unwrap(),
            Message::LeaderBoard {
                entries: vec![
                    LeaderBoardEntry {
                        id: 10,
                        name: "alpha".to_string()
                    },
                    LeaderBoardEntry {
                        id: 20,
                        name: "beta".to_string()
                    },
                ]
            }
        );
    }

    #[test]
    fn unclassified_is_a_float_array() {
        let buf = Writer::new(tags::UNCLASSIFIED).u32(2).f32(1.0).f32(2.0).0;
        assert_eq!(
            decode(&buf).unwrap(),
            Message::Unclassified {
                values: vec![1.0, 2.0]
            }
        );
    }

    #[test]
    fn unrecognized_tag_is_not_an_error() {
        let message = decode(&[99, 1, 2, 3]).unwrap();
        assert_eq!(
            message,
            Message::Unknown {
                tag: 99,
                data: vec![1, 2, 3],
            }
        );

        // Even with nothing after the tag.
        assert_eq!(
            decode(&[200]).unwrap(),
            Message::Unknown {
                tag: 200,
                data: vec![],
            }
        );
    }

    #[test]
    fn empty_buffer_has_no_tag() {
        // No tag is known, so this stays a bare bounds error.
        assert!(matches!(
            decode(&[]),
            Err(DecodeError::OutOfBounds { offset: 0, .. })
        ));
    }

    #[test]
    fn trailing_bytes_are_ignored() {
        let buf = Writer::new(tags::USER_ID).u32(1).u8(0xAB).0;
        assert_eq!(decode(&buf).unwrap(), Message::UserId { id: 1 });
    }
}
