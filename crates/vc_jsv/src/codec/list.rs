use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::any::Any;

use crate::dispatch::{Context, LazyParser, LazyWriter};
use crate::format::Format;
use crate::info::{InfoFn, ListInfo};
use crate::state::DepthGuard;
use crate::{Error, Result};

/// Writes and reads the items of any list-shaped container.
pub struct SequenceCodec {
    item: InfoFn,
    writer: LazyWriter,
    parser: LazyParser,
}

impl SequenceCodec {
    pub(super) const fn new(format: Format, item: InfoFn) -> Self {
        Self {
            item,
            writer: LazyWriter::new(format, item),
            parser: LazyParser::new(format, item),
        }
    }

    /// Writes `value`, a container described by `info`, as `[a,b,..]`.
    pub fn write(&self, out: &mut String, value: &dyn Any, info: &ListInfo, cx: &Context<'_>) {
        let Some(_depth) = DepthGuard::enter(cx.config().max_depth) else {
            cx.primitives().write_null(out);
            return;
        };
        let write = self.writer.get();
        let mut first = true;
        out.push('[');
        info.for_each(value, &mut |item| {
            if !first {
                out.push(',');
            }
            first = false;
            write(out, item, cx);
        });
        out.push(']');
    }

    /// Reads the items of a list token in written order.
    ///
    /// Returns `None` for null. An empty slot, including one after a trailing
    /// separator, becomes the default value of the item type.
    pub fn read(&self, text: &str, cx: &Context<'_>) -> Result<Option<Vec<Box<dyn Any>>>> {
        let p = cx.primitives();
        let Some(inner) = p.strip_list(text) else {
            return Ok(None);
        };
        let mut items = Vec::new();
        if inner.is_empty() {
            return Ok(Some(items));
        }
        let Some(_depth) = DepthGuard::enter(cx.config().max_depth) else {
            return Ok(None);
        };

        let parse = self.parser.get();
        let bytes = inner.as_bytes();
        let mut index = 0;
        loop {
            p.eat_whitespace(inner, &mut index);
            let token = p.eat_value(inner, &mut index);
            let item = match parse(token, cx)? {
                Some(item) => item,
                None => self.default_item()?,
            };
            items.push(item);

            p.eat_whitespace(inner, &mut index);
            match bytes.get(index) {
                None => break,
                Some(b',') => index += 1,
                Some(_) => {
                    log::debug!("list has an unexpected character at {index}, rest skipped");
                    break;
                }
            }
        }
        Ok(Some(items))
    }

    fn default_item(&self) -> Result<Box<dyn Any>> {
        let item = (self.item)();
        item.default_value().ok_or(Error::NoDefault {
            type_path: item.type_path(),
        })
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::collections::VecDeque;
    use alloc::string::{String, ToString};
    use alloc::vec;
    use alloc::vec::Vec;

    use crate::config::Config;
    use crate::dispatch::{Context, resolve_parser, resolve_writer};
    use crate::format::Format;
    use crate::impls::Stack;
    use crate::info::Typed;
    use crate::Result;

    fn write<T: Typed>(format: Format, value: &T) -> String {
        let config = Config::default();
        let mut out = String::new();
        resolve_writer(format, T::type_info())(&mut out, value, &Context::new(format, &config));
        out
    }

    fn read<T: Typed>(format: Format, text: &str) -> Result<Option<T>> {
        let config = Config::default();
        let parsed = resolve_parser(format, T::type_info())(text, &Context::new(format, &config))?;
        Ok(parsed.and_then(|v| v.downcast::<T>().ok()).map(|v| *v))
    }

    #[test]
    fn trailing_empty_slot_is_kept() {
        let items: Vec<i32> = read(Format::Json, "[1,2,]").unwrap().unwrap();
        assert_eq!(items, [1, 2, 0]);
        let items: Vec<String> = read(Format::Jsv, "[a,,b]").unwrap().unwrap();
        assert_eq!(items, ["a", "", "b"]);
    }

    #[test]
    fn nested_and_quoted_items() {
        let value = vec![vec!["a,b".to_string()], vec![]];
        let text = write(Format::Jsv, &value);
        assert_eq!(text, r#"[["a,b"],[]]"#);
        assert_eq!(read::<Vec<Vec<String>>>(Format::Jsv, &text).unwrap().unwrap(), value);
        assert_eq!(write(Format::Json, &value), r#"[["a,b"],[]]"#);
    }

    #[test]
    fn empty_and_null() {
        assert_eq!(read::<Vec<u8>>(Format::Json, "[]").unwrap(), Some(vec![]));
        assert_eq!(read::<Vec<u8>>(Format::Json, "null").unwrap(), None);
        assert_eq!(read::<Vec<u8>>(Format::Jsv, "").unwrap(), None);
        assert_eq!(read::<Vec<u8>>(Format::Jsv, " [ 1 , 2 ] ").unwrap(), Some(vec![1, 2]));
    }

    #[test]
    fn queues_stacks_and_arrays() {
        let queue: VecDeque<u8> = [1, 2, 3].into_iter().collect();
        assert_eq!(write(Format::Jsv, &queue), "[1,2,3]");

        let stack: Stack<u8> = [1, 2, 3].into_iter().collect();
        assert_eq!(write(Format::Jsv, &stack), "[3,2,1]");
        let back: Stack<u8> = read(Format::Jsv, "[3,2,1]").unwrap().unwrap();
        assert_eq!(back.peek(), Some(&3));

        let array: [u8; 2] = read(Format::Json, "[4,5]").unwrap().unwrap();
        assert_eq!(array, [4, 5]);
        assert!(read::<[u8; 2]>(Format::Json, "[4]").is_err());
    }
}
