//! Errors for the logic engine.
//!
//! Only misuse raises an `Error`: popping the base context, malformed rule
//! definitions, duplicate registrations, dereferencing an unbound pattern
//! reference. A failed match or a failed deduction is not an error, it is
//! an empty result.

use std::fmt;

/// Result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can be returned by the engine.
#[derive(Debug, Clone)]
pub struct Error(Box<ErrorImpl>);

#[derive(Debug, Clone)]
pub struct ErrorImpl {
    pub msg: ErrorMsg,
    pub source: Option<Error>,
}

/// An error message.
#[derive(Debug, Clone)]
pub enum ErrorMsg {
    EStatic(&'static str),
    EDyn(String),
}

/// Build an error from a format string.
#[macro_export]
macro_rules! errorstr {
    ($($t:tt)*) => {
        $crate::error::Error::new_string(format!($($t)*))
    };
}

mod impls {
    use super::*;

    impl std::ops::Deref for Error {
        type Target = ErrorImpl;
        fn deref(&self) -> &Self::Target {
            &*self.0
        }
    }

    impl fmt::Display for Error {
        fn fmt(&self, out: &mut fmt::Formatter) -> fmt::Result {
            match &self.msg {
                ErrorMsg::EStatic(msg) => write!(out, "{}", msg),
                ErrorMsg::EDyn(s) => write!(out, "{}", &s),
            }
        }
    }

    impl std::error::Error for Error {
        fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
            match &self.source {
                None => None,
                Some(p) => Some(&*p),
            }
        }
    }
}

impl Error {
    /// Build a new error.
    pub fn new(msg: &'static str) -> Self {
        Error(Box::new(ErrorImpl {
            msg: ErrorMsg::EStatic(msg),
            source: None,
        }))
    }

    pub fn new_string(msg: String) -> Self {
        Error(Box::new(ErrorImpl {
            msg: ErrorMsg::EDyn(msg),
            source: None,
        }))
    }

    /// Change the source of this error.
    pub fn set_source(&mut self, src: Self) {
        // append at the end of the `source` linked list.
        if let Some(e2) = &mut self.0.source {
            e2.set_source(src)
        } else {
            self.0.source = Some(src);
        }
    }

    pub fn with_source(mut self, src: Self) -> Self {
        self.set_source(src);
        self
    }

    /// Display the error, along with its source if any.
    pub fn to_string_with_src(&self) -> String {
        use std::fmt::Write;

        let mut s = String::new();
        let mut e = self;
        loop {
            let _ = write!(&mut s, "{}", e);
            if let Some(src) = &e.0.source {
                s.push_str("\nin ");
                e = src;
            } else {
                break;
            }
        }
        s
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_size() {
        // errors should be relatively small (one pointer here)
        assert!(std::mem::size_of::<Error>() <= 8);
    }

    #[test]
    fn test_send() {
        let _: &dyn Send = &Error::new("foo");
    }

    #[test]
    fn test_source_chain() {
        let e = errorstr!("cannot define rule `{}`", "Foo")
            .with_source(Error::new("variable `x` occurs only on the left"));
        assert_eq!(
            e.to_string_with_src(),
            "cannot define rule `Foo`\nin variable `x` occurs only on the left"
        );
        assert!(std::error::Error::source(&e).is_some());
    }
}
