//! Call arguments of a translation.
//!
//! [`CallArgs`] is the typed form. [`Arg`] models the loosely typed trailing
//! argument list (`t!(tr, "key", 3, replace, context)`), whose roles are
//! decided by each argument's shape:
//!
//! | first argument | meaning    | following arguments                          |
//! |----------------|------------|----------------------------------------------|
//! | replace map    | `replace`  | context map                                  |
//! | integer        | `count`    | replace map, context map                     |
//! | string         | `fallback` | integer count, replace map, context map      |
//!
//! With exactly four arguments the fourth is always the context map. Any other
//! first argument is a usage error. Later arguments of an unexpected shape are
//! ignored.

use crate::error::{ArgKind, ArgsError};
use crate::params::{Context, Replace};

/// Resolved parameters of one translate call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallArgs {
    pub count: Option<i64>,
    pub replace: Replace,
    pub context: Option<Context>,
    pub fallback: Option<String>,
}

impl CallArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(mut self, count: i64) -> Self {
        self.count = Some(count);
        self
    }

    pub fn replace(mut self, replace: Replace) -> Self {
        self.replace = replace;
        self
    }

    /// Adds one replacement value.
    pub fn with(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.replace.insert(name, value);
        self
    }

    pub fn context(mut self, context: Context) -> Self {
        self.context = Some(context);
        self
    }

    pub fn fallback(mut self, text: impl Into<String>) -> Self {
        self.fallback = Some(text.into());
        self
    }

    /// Assigns roles to a loosely typed argument list.
    pub fn from_args(args: &[Arg]) -> Result<Self, ArgsError> {
        if args.len() > 4 {
            return Err(ArgsError::TooMany(args.len()));
        }

        let mut call = CallArgs::default();
        if args.len() == 4 {
            match &args[3] {
                Arg::Context(context) => call.context = Some(context.clone()),
                other => return Err(ArgsError::FourthNotContext(other.kind())),
            }
        }

        let Some(first) = args.first() else {
            return Ok(call);
        };

        match first {
            Arg::Replace(replace) => {
                call.replace = replace.clone();
                if let Some(Arg::Context(context)) = args.get(1) {
                    call.context = Some(context.clone());
                }
            }
            Arg::Count(count) => {
                call.count = Some(*count);
                if let Some(Arg::Replace(replace)) = args.get(1) {
                    call.replace = replace.clone();
                }
                if let Some(Arg::Context(context)) = args.get(2) {
                    call.context = Some(context.clone());
                }
            }
            Arg::Text(text) => {
                call.fallback = Some(text.clone());
                let mut offset = 1;
                if let Some(Arg::Count(count)) = args.get(1) {
                    call.count = Some(*count);
                    offset += 1;
                }
                if let Some(Arg::Replace(replace)) = args.get(offset) {
                    call.replace = replace.clone();
                }
                if call.count.is_none()
                    && let Some(Arg::Context(context)) = args.get(2)
                {
                    call.context = Some(context.clone());
                }
            }
            Arg::Context(_) => return Err(ArgsError::UnexpectedFirst(first.kind())),
        }

        Ok(call)
    }
}

/// One dynamically shaped translate argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Arg {
    Text(String),
    Count(i64),
    Replace(Replace),
    Context(Context),
}

impl Arg {
    pub fn kind(&self) -> ArgKind {
        match self {
            Arg::Text(_) => ArgKind::Text,
            Arg::Count(_) => ArgKind::Count,
            Arg::Replace(_) => ArgKind::Replace,
            Arg::Context(_) => ArgKind::Context,
        }
    }
}

impl From<&str> for Arg {
    fn from(text: &str) -> Self {
        Arg::Text(text.to_string())
    }
}

impl From<String> for Arg {
    fn from(text: String) -> Self {
        Arg::Text(text)
    }
}

impl From<i64> for Arg {
    fn from(count: i64) -> Self {
        Arg::Count(count)
    }
}

impl From<i32> for Arg {
    fn from(count: i32) -> Self {
        Arg::Count(i64::from(count))
    }
}

impl From<u32> for Arg {
    fn from(count: u32) -> Self {
        Arg::Count(i64::from(count))
    }
}

impl From<Replace> for Arg {
    fn from(replace: Replace) -> Self {
        Arg::Replace(replace)
    }
}

impl From<Context> for Arg {
    fn from(context: Context) -> Self {
        Arg::Context(context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn replace() -> Replace {
        Replace::from([("name", "Jane")])
    }

    fn context() -> Context {
        Context::from([("gender", "female")])
    }

    #[test]
    fn test_no_args() {
        assert_eq!(CallArgs::from_args(&[]).unwrap(), CallArgs::new());
    }

    #[test]
    fn test_replace_first() {
        let call = CallArgs::from_args(&[replace().into(), context().into()]).unwrap();
        assert_eq!(call, CallArgs::new().replace(replace()).context(context()));
    }

    #[test]
    fn test_count_first() {
        let call = CallArgs::from_args(&[4.into()]).unwrap();
        assert_eq!(call, CallArgs::new().count(4));

        let call =
            CallArgs::from_args(&[4.into(), replace().into(), context().into()]).unwrap();
        assert_eq!(
            call,
            CallArgs::new().count(4).replace(replace()).context(context())
        );
    }

    #[test]
    fn test_text_first() {
        let call = CallArgs::from_args(&["Long text".into()]).unwrap();
        assert_eq!(call, CallArgs::new().fallback("Long text"));

        let call = CallArgs::from_args(&["%n days".into(), 3.into(), replace().into()]).unwrap();
        assert_eq!(
            call,
            CallArgs::new().fallback("%n days").count(3).replace(replace())
        );

        let call =
            CallArgs::from_args(&["text".into(), replace().into(), context().into()]).unwrap();
        assert_eq!(
            call,
            CallArgs::new()
                .fallback("text")
                .replace(replace())
                .context(context())
        );
    }

    #[test]
    fn test_four_args_last_is_context() {
        let call = CallArgs::from_args(&[
            "text".into(),
            2.into(),
            replace().into(),
            context().into(),
        ])
        .unwrap();
        assert_eq!(
            call,
            CallArgs::new()
                .fallback("text")
                .count(2)
                .replace(replace())
                .context(context())
        );

        let err = CallArgs::from_args(&["a".into(), 1.into(), replace().into(), "b".into()])
            .unwrap_err();
        assert_eq!(err, ArgsError::FourthNotContext(ArgKind::Text));
    }

    #[test]
    fn test_context_first_is_usage_error() {
        let err = CallArgs::from_args(&[context().into()]).unwrap_err();
        assert_eq!(err, ArgsError::UnexpectedFirst(ArgKind::Context));
    }

    #[test]
    fn test_too_many_args() {
        let args: Vec<Arg> = (0..5i64).map(Arg::from).collect();
        assert_eq!(CallArgs::from_args(&args).unwrap_err(), ArgsError::TooMany(5));
    }

    #[test]
    fn test_misplaced_later_args_are_ignored() {
        let call = CallArgs::from_args(&[replace().into(), 5.into()]).unwrap();
        assert_eq!(call, CallArgs::new().replace(replace()));
    }
}
