//! Describing values as comparison [`Node`]s.
//!
//! Types take part in a comparison by implementing [`Diffable`]. Scalars,
//! strings, options, smart pointers, sequences, maps, timestamps and
//! `serde_json` values are covered here; records use the
//! [`diffable_record!`](crate::diffable_record) macro.

use crate::diff::model::Node;
use chrono::{DateTime, TimeZone, Utc};
use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use std::hash::BuildHasher;
use std::rc::Rc;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

/// A value that can describe its own shape for comparison.
pub trait Diffable {
    fn describe(&self, cx: &mut Describer) -> Node;
}

/// Map key rendering.
///
/// Keys are compared and ordered by their rendered form.
pub trait DiffKey {
    fn diff_key(&self) -> String;
}

/// Traversal state for one description pass.
///
/// Tracks the shared pointers currently being described so that a
/// reference cycle yields an opaque node instead of unbounded recursion.
#[derive(Debug, Default)]
pub struct Describer {
    in_progress: HashSet<usize>,
}

impl Describer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn describe<T: Diffable + ?Sized>(&mut self, value: &T) -> Node {
        value.describe(self)
    }

    /// Describe a value reachable through a shared pointer at `address`.
    pub fn shared<T: Diffable + ?Sized>(&mut self, address: usize, value: &T) -> Node {
        if !self.in_progress.insert(address) {
            return Node::Opaque("<cycle>".to_string());
        }
        let node = value.describe(self);
        self.in_progress.remove(&address);
        node
    }
}

/// Describe a value with a fresh [`Describer`].
pub fn describe<T: Diffable + ?Sized>(value: &T) -> Node {
    Describer::new().describe(value)
}

/// Implement [`Diffable`] for a struct by listing its fields in declared order.
///
/// ```
/// use vzdiff_core::diffable_record;
///
/// struct Endpoint {
///     host: String,
///     port: u16,
/// }
///
/// diffable_record!(Endpoint { host, port });
///
/// let a = Endpoint { host: "a".into(), port: 80 };
/// let b = Endpoint { host: "a".into(), port: 0 };
/// assert_eq!(vzdiff_core::diff::diff(&a, &b), "");
/// ```
#[macro_export]
macro_rules! diffable_record {
    ($name:ident { $($field:ident),* $(,)? }) => {
        impl $crate::diff::Diffable for $name {
            fn describe(&self, cx: &mut $crate::diff::Describer) -> $crate::diff::Node {
                $crate::diff::Node::Record {
                    type_name: stringify!($name),
                    fields: vec![$((stringify!($field), cx.describe(&self.$field))),*],
                }
            }
        }
    };
}

// ---------------------------------------------------------------------------
// Scalars
// ---------------------------------------------------------------------------

impl Diffable for str {
    fn describe(&self, _cx: &mut Describer) -> Node {
        Node::Str(self.to_string())
    }
}

impl Diffable for String {
    fn describe(&self, _cx: &mut Describer) -> Node {
        Node::Str(self.clone())
    }
}

impl Diffable for char {
    fn describe(&self, _cx: &mut Describer) -> Node {
        Node::Str(self.to_string())
    }
}

impl Diffable for bool {
    fn describe(&self, _cx: &mut Describer) -> Node {
        Node::Bool(*self)
    }
}

macro_rules! signed_diffable {
    ($($t:ty),*) => {$(
        impl Diffable for $t {
            fn describe(&self, _cx: &mut Describer) -> Node {
                Node::Signed(i128::from(*self))
            }
        }
    )*};
}

macro_rules! unsigned_diffable {
    ($($t:ty),*) => {$(
        impl Diffable for $t {
            fn describe(&self, _cx: &mut Describer) -> Node {
                Node::Unsigned(u128::from(*self))
            }
        }
    )*};
}

signed_diffable!(i8, i16, i32, i64, i128);
unsigned_diffable!(u8, u16, u32, u64, u128);

impl Diffable for isize {
    fn describe(&self, _cx: &mut Describer) -> Node {
        Node::Signed(*self as i128)
    }
}

impl Diffable for usize {
    fn describe(&self, _cx: &mut Describer) -> Node {
        Node::Unsigned(*self as u128)
    }
}

impl Diffable for f32 {
    fn describe(&self, _cx: &mut Describer) -> Node {
        Node::Float(f64::from(*self))
    }
}

impl Diffable for f64 {
    fn describe(&self, _cx: &mut Describer) -> Node {
        Node::Float(*self)
    }
}

impl<Tz: TimeZone> Diffable for DateTime<Tz> {
    fn describe(&self, _cx: &mut Describer) -> Node {
        Node::Timestamp(self.with_timezone(&Utc))
    }
}

impl Diffable for SystemTime {
    /// Instants outside chrono's range describe as opaque values.
    fn describe(&self, _cx: &mut Describer) -> Node {
        system_time_to_utc(*self)
            .map(Node::Timestamp)
            .unwrap_or_else(|| Node::Opaque(format!("{:?}", self)))
    }
}

fn system_time_to_utc(time: SystemTime) -> Option<DateTime<Utc>> {
    match time.duration_since(UNIX_EPOCH) {
        Ok(after) => {
            let secs = i64::try_from(after.as_secs()).ok()?;
            DateTime::from_timestamp(secs, after.subsec_nanos())
        }
        Err(err) => {
            let before = err.duration();
            let secs = i64::try_from(before.as_secs()).ok()?;
            match before.subsec_nanos() {
                0 => DateTime::from_timestamp(secs.checked_neg()?, 0),
                nanos => DateTime::from_timestamp(
                    secs.checked_neg()?.checked_sub(1)?,
                    1_000_000_000 - nanos,
                ),
            }
        }
    }
}

// ---------------------------------------------------------------------------
// References and pointers
// ---------------------------------------------------------------------------

impl<T: Diffable + ?Sized> Diffable for &T {
    fn describe(&self, cx: &mut Describer) -> Node {
        (**self).describe(cx)
    }
}

impl<T: Diffable> Diffable for Option<T> {
    fn describe(&self, cx: &mut Describer) -> Node {
        Node::Optional(self.as_ref().map(|v| Box::new(cx.describe(v))))
    }
}

impl<T: Diffable + ?Sized> Diffable for Box<T> {
    fn describe(&self, cx: &mut Describer) -> Node {
        (**self).describe(cx)
    }
}

impl<T: Diffable + ?Sized> Diffable for Rc<T> {
    fn describe(&self, cx: &mut Describer) -> Node {
        cx.shared(Rc::as_ptr(self) as *const () as usize, &**self)
    }
}

impl<T: Diffable + ?Sized> Diffable for Arc<T> {
    fn describe(&self, cx: &mut Describer) -> Node {
        cx.shared(Arc::as_ptr(self) as *const () as usize, &**self)
    }
}

impl<T: Diffable + ?Sized> Diffable for RefCell<T> {
    fn describe(&self, cx: &mut Describer) -> Node {
        match self.try_borrow() {
            Ok(value) => value.describe(cx),
            Err(_) => Node::Opaque("<borrowed>".to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// Sequences
// ---------------------------------------------------------------------------

impl<T: Diffable> Diffable for [T] {
    fn describe(&self, cx: &mut Describer) -> Node {
        Node::Sequence(Some(self.iter().map(|v| cx.describe(v)).collect()))
    }
}

impl<T: Diffable, const N: usize> Diffable for [T; N] {
    fn describe(&self, cx: &mut Describer) -> Node {
        self.as_slice().describe(cx)
    }
}

impl<T: Diffable> Diffable for Vec<T> {
    fn describe(&self, cx: &mut Describer) -> Node {
        self.as_slice().describe(cx)
    }
}

impl<T: Diffable> Diffable for VecDeque<T> {
    fn describe(&self, cx: &mut Describer) -> Node {
        Node::Sequence(Some(self.iter().map(|v| cx.describe(v)).collect()))
    }
}

// ---------------------------------------------------------------------------
// Maps
// ---------------------------------------------------------------------------

impl DiffKey for str {
    fn diff_key(&self) -> String {
        format!("{:?}", self)
    }
}

impl DiffKey for String {
    fn diff_key(&self) -> String {
        self.as_str().diff_key()
    }
}

impl DiffKey for char {
    fn diff_key(&self) -> String {
        format!("{:?}", self)
    }
}

macro_rules! display_key {
    ($($t:ty),*) => {$(
        impl DiffKey for $t {
            fn diff_key(&self) -> String {
                self.to_string()
            }
        }
    )*};
}

display_key!(bool, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

impl<K: DiffKey + ?Sized> DiffKey for &K {
    fn diff_key(&self) -> String {
        (**self).diff_key()
    }
}

fn describe_entries<'a, K, V, I>(entries: I, cx: &mut Describer) -> Node
where
    K: DiffKey + 'a + ?Sized,
    V: Diffable + 'a,
    I: Iterator<Item = (&'a K, &'a V)>,
{
    let described: BTreeMap<String, Node> = entries
        .map(|(k, v)| (k.diff_key(), cx.describe(v)))
        .collect();
    Node::Map(Some(described))
}

impl<K: DiffKey, V: Diffable> Diffable for BTreeMap<K, V> {
    fn describe(&self, cx: &mut Describer) -> Node {
        describe_entries(self.iter(), cx)
    }
}

impl<K: DiffKey, V: Diffable, S: BuildHasher> Diffable for HashMap<K, V, S> {
    fn describe(&self, cx: &mut Describer) -> Node {
        describe_entries(self.iter(), cx)
    }
}

// ---------------------------------------------------------------------------
// serde_json
// ---------------------------------------------------------------------------

impl Diffable for serde_json::Map<String, serde_json::Value> {
    fn describe(&self, cx: &mut Describer) -> Node {
        describe_entries(self.iter(), cx)
    }
}

impl Diffable for serde_json::Number {
    fn describe(&self, _cx: &mut Describer) -> Node {
        if let Some(u) = self.as_u64() {
            Node::Unsigned(u128::from(u))
        } else if let Some(i) = self.as_i64() {
            Node::Signed(i128::from(i))
        } else {
            Node::Float(self.as_f64().unwrap_or(f64::NAN))
        }
    }
}

impl Diffable for serde_json::Value {
    fn describe(&self, cx: &mut Describer) -> Node {
        use serde_json::Value;
        match self {
            Value::Null => Node::Optional(None),
            Value::Bool(b) => Node::Bool(*b),
            Value::Number(n) => n.describe(cx),
            Value::String(s) => Node::Str(s.clone()),
            Value::Array(items) => items.describe(cx),
            Value::Object(map) => map.describe(cx),
        }
    }
}
