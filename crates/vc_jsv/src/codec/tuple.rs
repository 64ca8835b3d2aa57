use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::any::Any;

use crate::dispatch::{Context, LazyParser, LazyWriter};
use crate::format::{Escape, Format};
use crate::info::{TupleInfo, TupleKind};
use crate::state::DepthGuard;
use crate::{Error, Result};

/// Writes and reads a tuple or key-value pair as a map of its fields.
///
/// Unlike structs, tuples are strict on read: a key that names no field is
/// an error.
pub struct TupleCodec {
    info: &'static TupleInfo,
    writers: Box<[LazyWriter]>,
    parsers: Box<[LazyParser]>,
}

impl TupleCodec {
    pub(super) fn new(format: Format, info: &'static TupleInfo) -> Self {
        Self {
            info,
            writers: info
                .fields()
                .iter()
                .map(|field| LazyWriter::new(format, *field))
                .collect(),
            parsers: info
                .fields()
                .iter()
                .map(|field| LazyParser::new(format, *field))
                .collect(),
        }
    }

    pub fn write(&self, out: &mut String, value: &dyn Any, cx: &Context<'_>) {
        let p = cx.primitives();
        let config = cx.config();
        let Some(_depth) = DepthGuard::enter(config.max_depth) else {
            p.write_null(out);
            return;
        };

        out.push('{');
        let mut first = true;
        for (index, writer) in self.writers.iter().enumerate() {
            let (Some(field), Some(name)) = (self.info.field(value, index), self.info.field_name(index))
            else {
                log::error!("field {index} of `{}` could not be read", self.info.type_path());
                continue;
            };
            if !config.include_null_values && (self.info.fields()[index])().is_null(field) {
                continue;
            }
            if !first {
                out.push(',');
            }
            first = false;
            p.write_string(out, name, Escape::empty());
            out.push(':');
            writer.get()(out, field, cx);
        }
        out.push('}');
    }

    /// Reads a tuple value. Missing fields take their default.
    pub fn read(&self, text: &str, cx: &Context<'_>) -> Result<Option<Box<dyn Any>>> {
        let p = cx.primitives();
        let text = text.trim();
        if p.is_null(text) {
            return Ok(None);
        }
        let Some(_depth) = DepthGuard::enter(cx.config().max_depth) else {
            return Ok(None);
        };

        let len = self.info.field_len();
        let mut slots: Vec<Option<Box<dyn Any>>> = (0..len).map(|_| None).collect();
        let mut index = 0;
        p.eat_map_start(text, &mut index);

        loop {
            let raw_key = p.eat_map_key(text, &mut index);
            if raw_key.is_empty() {
                break;
            }
            let key = p.unescape_string(raw_key);
            p.eat_map_key_separator(text, &mut index);
            let value = p.eat_value(text, &mut index);

            if key != cx.config().type_attr {
                match self.field_index(&key) {
                    Some(field) if field < len => slots[field] = self.parsers[field].get()(value, cx)?,
                    Some(_) => log::warn!(
                        "`{key}` is out of range for `{}`, skipped",
                        self.info.type_path()
                    ),
                    None => {
                        return Err(Error::UnknownMember {
                            type_path: self.info.type_path(),
                            name: key.into_owned(),
                        });
                    }
                }
            }

            if !p.eat_item_separator_or_map_end(text, &mut index) {
                break;
            }
        }

        let fields = slots
            .into_iter()
            .zip(self.info.fields())
            .map(|(slot, field)| match slot {
                Some(value) => Ok(value),
                None => {
                    let field = field();
                    field.default_value().ok_or(Error::NoDefault {
                        type_path: field.type_path(),
                    })
                }
            })
            .collect::<Result<Vec<_>>>()?;
        self.info.from_fields(fields).map(Some)
    }

    /// Maps `Key`/`Value` or `Item{n}` to a field index, ignoring case.
    ///
    /// An `Item{n}` past the last field returns an index out of range.
    fn field_index(&self, key: &str) -> Option<usize> {
        match self.info.kind() {
            TupleKind::KeyValue => {
                if key.eq_ignore_ascii_case("Key") {
                    Some(0)
                } else if key.eq_ignore_ascii_case("Value") {
                    Some(1)
                } else {
                    None
                }
            }
            TupleKind::Tuple => {
                let (prefix, number) = (key.get(..4)?, key.get(4..)?);
                if !prefix.eq_ignore_ascii_case("Item") {
                    return None;
                }
                let number: usize = number.parse().ok()?;
                Some(number.checked_sub(1).unwrap_or(usize::MAX))
            }
        }
    }
}

// -----------------------------------------------------------------------------
// Tests
