use std::{collections::BTreeMap, fmt, sync::Arc};

/// A single hashable argument value.
///
/// Every integer primitive converts into [`Value::Int`], so `1u8` and `1i64`
/// land in the same bucket.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Value {
    /// Absence of a value.
    #[default]
    None,
    /// Boolean value.
    Bool(bool),
    /// Any integer value.
    Int(i128),
    /// String value.
    Str(Arc<str>),
    /// Raw bytes.
    Bytes(Arc<[u8]>),
    /// Ordered sequence of values.
    List(Vec<Value>),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("None"),
            Self::Bool(value) => write!(f, "{value}"),
            Self::Int(value) => write!(f, "{value}"),
            Self::Str(value) => write!(f, "{value:?}"),
            Self::Bytes(value) => write!(f, "{value:?}"),
            Self::List(values) => {
                f.write_str("[")?;
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{value}")?;
                }
                f.write_str("]")
            }
        }
    }
}

macro_rules! impl_value_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(value: $t) -> Self {
                    Self::Int(i128::from(value))
                }
            }
        )*
    };
}

impl_value_from_int!(i8, i16, i32, i64, u8, u16, u32, u64);

impl From<usize> for Value {
    fn from(value: usize) -> Self {
        Self::Int(value as i128)
    }
}

impl From<isize> for Value {
    fn from(value: isize) -> Self {
        Self::Int(value as i128)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Self::None
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Str(Arc::from(value))
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Str(Arc::from(value))
    }
}

impl From<Arc<str>> for Value {
    fn from(value: Arc<str>) -> Self {
        Self::Str(value)
    }
}

impl From<&[u8]> for Value {
    fn from(value: &[u8]) -> Self {
        Self::Bytes(Arc::from(value))
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::None, Into::into)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(values: Vec<T>) -> Self {
        Self::List(values.into_iter().map(Into::into).collect())
    }
}

/// Positional and keyword arguments of one call.
///
/// Keyword arguments are kept sorted by name, so the order they were added in
/// never affects equality or hashing.
///
/// # Examples
///
/// ```
/// use cooldowns::{CallArgs, Value, call_args};
///
/// let args = CallArgs::new().arg(1).kwarg("user", "alice");
/// assert_eq!(args, call_args![1; user = "alice"]);
/// assert_eq!(args.keyword_arg("user"), Some(&Value::from("alice")));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CallArgs {
    positional: Vec<Value>,
    keyword: BTreeMap<Arc<str>, Value>,
}

impl CallArgs {
    /// Empty argument list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a positional argument.
    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.positional.push(value.into());
        self
    }

    /// Set a keyword argument, replacing any previous value under `name`.
    pub fn kwarg(mut self, name: impl Into<Arc<str>>, value: impl Into<Value>) -> Self {
        self.keyword.insert(name.into(), value.into());
        self
    }

    /// Positional arguments, in call order.
    pub fn positional(&self) -> &[Value] {
        &self.positional
    }

    /// Keyword arguments, sorted by name.
    pub fn keyword(&self) -> &BTreeMap<Arc<str>, Value> {
        &self.keyword
    }

    /// Positional argument at `index`.
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.positional.get(index)
    }

    /// Keyword argument called `name`.
    pub fn keyword_arg(&self, name: &str) -> Option<&Value> {
        self.keyword.get(name)
    }

    /// Whether there are no arguments at all.
    pub fn is_empty(&self) -> bool {
        self.positional.is_empty() && self.keyword.is_empty()
    }

    pub(crate) fn positional_only(&self) -> Self {
        Self {
            positional: self.positional.clone(),
            keyword: BTreeMap::new(),
        }
    }

    pub(crate) fn keyword_only(&self) -> Self {
        Self {
            positional: Vec::new(),
            keyword: self.keyword.clone(),
        }
    }

    pub(crate) fn single(value: Value) -> Self {
        Self {
            positional: vec![value],
            keyword: BTreeMap::new(),
        }
    }
}

impl fmt::Display for CallArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;

        let positional = self.positional.iter().map(|value| (None, value));
        let keyword = self
            .keyword
            .iter()
            .map(|(name, value)| (Some(name), value));

        for (i, (name, value)) in positional.chain(keyword).enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            match name {
                Some(name) => write!(f, "{name}={value}")?,
                None => write!(f, "{value}")?,
            }
        }

        f.write_str(")")
    }
}

/// Build [`CallArgs`] with call-like syntax.
///
/// Positional arguments come first, then an optional `;` followed by
/// `name = value` keyword arguments.
///
/// ```
/// use cooldowns::{CallArgs, call_args};
///
/// assert_eq!(call_args![], CallArgs::new());
/// assert_eq!(call_args![1, 2], CallArgs::new().arg(1).arg(2));
/// assert_eq!(call_args![; two = 2], CallArgs::new().kwarg("two", 2));
/// assert_eq!(
///     call_args![1; two = 2, three = "3"],
///     CallArgs::new().arg(1).kwarg("two", 2).kwarg("three", "3"),
/// );
/// ```
#[macro_export]
macro_rules! call_args {
    () => {
        $crate::CallArgs::new()
    };
    ($($arg:expr),* $(,)? $(; $($name:ident = $value:expr),* $(,)?)?) => {{
        #[allow(unused_mut)]
        let mut args = $crate::CallArgs::new();
        $( args = args.arg($arg); )*
        $($( args = args.kwarg(stringify!($name), $value); )*)?
        args
    }};
}
