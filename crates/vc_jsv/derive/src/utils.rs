use proc_macro2::TokenStream;
use syn::LitStr;

#[inline(always)]
pub(crate) fn empty() -> TokenStream {
    TokenStream::new()
}

// -----------------------------------------------------------------------------
// RenameRule

/// Naming convention applied by `#[jsv(rename_all = "...")]`.
#[derive(Debug, Clone, Copy)]
pub(crate) enum RenameRule {
    CamelCase,
    PascalCase,
    SnakeCase,
}

impl RenameRule {
    pub fn from_lit(lit: &LitStr) -> syn::Result<Self> {
        match lit.value().as_str() {
            "camelCase" => Ok(Self::CamelCase),
            "PascalCase" => Ok(Self::PascalCase),
            "snake_case" => Ok(Self::SnakeCase),
            _ => Err(syn::Error::new(
                lit.span(),
                "expected one of: \"camelCase\", \"PascalCase\", \"snake_case\"",
            )),
        }
    }

    /// Renames a field (`snake_case`) or variant (`PascalCase`) identifier.
    pub fn apply(self, ident: &str) -> String {
        let words = split_words(ident.trim_start_matches("r#"));
        let mut out = String::with_capacity(ident.len() + 4);
        match self {
            Self::SnakeCase => {
                for (index, word) in words.iter().enumerate() {
                    if index > 0 {
                        out.push('_');
                    }
                    out.push_str(&word.to_lowercase());
                }
            }
            Self::PascalCase | Self::CamelCase => {
                for (index, word) in words.iter().enumerate() {
                    if index == 0 && matches!(self, Self::CamelCase) {
                        out.push_str(&word.to_lowercase());
                    } else {
                        capitalize_into(&mut out, word);
                    }
                }
            }
        }
        out
    }
}

fn split_words(name: &str) -> Vec<&str> {
    let mut words = Vec::new();
    let mut start = 0;
    let mut prev_lower = false;
    for (index, c) in name.char_indices() {
        if c == '_' {
            if start < index {
                words.push(&name[start..index]);
            }
            start = index + 1;
            prev_lower = false;
            continue;
        }
        if c.is_uppercase() && prev_lower {
            words.push(&name[start..index]);
            start = index;
        }
        prev_lower = c.is_lowercase() || c.is_ascii_digit();
    }
    if start < name.len() {
        words.push(&name[start..]);
    }
    words
}

fn capitalize_into(out: &mut String, word: &str) {
    let mut chars = word.chars();
    if let Some(first) = chars.next() {
        out.extend(first.to_uppercase());
        out.push_str(&chars.as_str().to_lowercase());
    }
}
