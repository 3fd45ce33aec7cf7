use crate::roll::Variables;
use lazy_static::lazy_static;
use regex::{Captures, Regex};
use std::borrow::Cow;

lazy_static! {
    static ref PLACEHOLDER: Regex = Regex::new(r"\{([^}]+)\}").unwrap();
}

/// Replaces every `{NAME}` with the decimal value of `NAME`. Unknown names are left as written.
pub fn substitute<'a>(src: &'a str, vars: &Variables) -> Cow<'a, str> {
    PLACEHOLDER.replace_all(src, |caps: &Captures| match vars.get(&caps[1]) {
        Some(x) => x.to_string(),
        None => caps[0].to_owned(),
    })
}
