//! Dynamic element and key type.
//!
//! `Value` is the tagged variant every map, set and bag keys on, and the
//! usual element type of lists. Value-like variants compare by value;
//! `Object` compares by identity.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, SecondsFormat, Utc};
use core::any::{Any, TypeId};
use core::cmp::Ordering;
use core::fmt;
use core::iter::Peekable;
use core::str::Chars;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

static NEXT_OBJECT_ID: AtomicU64 = AtomicU64::new(1);

// Compares two payloads already known to share a type.
type PayloadOrder = fn(&dyn Any, &dyn Any) -> Option<Ordering>;

fn payload_cmp<T: Any + Ord>(a: &dyn Any, b: &dyn Any) -> Option<Ordering> {
    Some(a.downcast_ref::<T>()?.cmp(b.downcast_ref::<T>()?))
}

/// Reference-identity object: two `ObjectRef`s are equal only when one was
/// cloned from the other, no matter what their payloads contain.
///
/// Objects built with `ordered` also take part in natural ordering through
/// their payload's `Ord`.
#[derive(Clone)]
pub struct ObjectRef {
    id: u64,
    payload: Rc<dyn Any>,
    order: Option<PayloadOrder>,
}

impl ObjectRef {
    pub fn new<T: Any>(payload: T) -> Self {
        Self {
            id: NEXT_OBJECT_ID.fetch_add(1, AtomicOrdering::Relaxed),
            payload: Rc::new(payload),
            order: None,
        }
    }

    /// Identity object whose payload orders it among naturally comparable
    /// keys.
    pub fn ordered<T: Any + Ord>(payload: T) -> Self {
        Self {
            order: Some(payload_cmp::<T> as PayloadOrder),
            ..Self::new(payload)
        }
    }

    /// Whether the object has a natural order.
    pub fn is_ordered(&self) -> bool {
        self.order.is_some()
    }

    fn payload_type(&self) -> TypeId {
        (*self.payload).type_id()
    }

    // Payloads of one type compare with their `Ord`; different payload
    // types rank by type id so the order stays total.
    fn natural_cmp(&self, other: &ObjectRef) -> Option<Ordering> {
        let order = self.order?;
        other.order?;
        let (a, b) = (self.payload_type(), other.payload_type());
        if a != b {
            return Some(a.cmp(&b));
        }
        order(&*self.payload, &*other.payload)
    }

    /// Process-unique id, never reused.
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        (*self.payload).downcast_ref::<T>()
    }

    pub fn ptr_eq(&self, other: &ObjectRef) -> bool {
        self.id == other.id
    }
}

impl PartialEq for ObjectRef {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for ObjectRef {}

impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectRef#{}", self.id)
    }
}

/// A dynamically-typed element or key.
#[derive(Clone, Debug)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Temporal(DateTime<FixedOffset>),
    /// Ordered collection used as a single value.
    Composite(Vec<Value>),
    Object(ObjectRef),
}

impl Value {
    pub fn object<T: Any>(payload: T) -> Self {
        Value::Object(ObjectRef::new(payload))
    }

    /// Identity object that is also naturally ordered by its payload.
    pub fn ordered_object<T: Any + Ord>(payload: T) -> Self {
        Value::Object(ObjectRef::ordered(payload))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    // Null < Bool < Number < Str < Temporal < Composite < Object
    fn rank(&self) -> u8 {
        match self {
            Value::Null => 0,
            Value::Bool(_) => 1,
            Value::Int(_) | Value::Float(_) => 2,
            Value::Str(_) => 3,
            Value::Temporal(_) => 4,
            Value::Composite(_) => 5,
            Value::Object(_) => 6,
        }
    }

    /// Whether the value takes part in natural ordering: booleans, numbers,
    /// strings, temporals and objects built with `ObjectRef::ordered`.
    pub fn is_naturally_comparable(&self) -> bool {
        match self {
            Value::Bool(_) | Value::Int(_) | Value::Float(_) | Value::Str(_) | Value::Temporal(_) => {
                true
            }
            Value::Object(o) => o.is_ordered(),
            Value::Null | Value::Composite(_) => false,
        }
    }

    /// Natural ordering between two naturally comparable values; `None` when
    /// either side has no natural order.
    ///
    /// A total order: numbers compare numerically, strings with
    /// numeric-aware string ordering, temporals chronologically and ordered
    /// objects by payload. Across classes:
    /// `Bool < Number < Str < Temporal < Object`.
    pub fn natural_cmp(&self, other: &Value) -> Option<Ordering> {
        use Value::*;
        if !self.is_naturally_comparable() || !other.is_naturally_comparable() {
            return None;
        }
        match (self, other) {
            (Bool(a), Bool(b)) => Some(a.cmp(b)),
            (Int(_) | Float(_), Int(_) | Float(_)) => Some(self.cmp(other)),
            (Str(a), Str(b)) => Some(natural_str_cmp(a, b)),
            (Temporal(a), Temporal(b)) => Some(a.cmp(b)),
            (Object(a), Object(b)) => a.natural_cmp(b),
            _ => Some(self.rank().cmp(&other.rank())),
        }
    }
}

fn cmp_int_float(i: i64, f: f64) -> Ordering {
    match (i as f64).total_cmp(&f) {
        // Lossy conversion tied; settle it exactly when f fits in i64.
        Ordering::Equal if (-9.2e18..9.2e18).contains(&f) => i.cmp(&(f as i64)),
        other => other,
    }
}

/// Numeric-aware string comparison: runs of ASCII digits compare by their
/// numeric value, so `"img2" < "img12"`.
pub fn natural_str_cmp(a: &str, b: &str) -> Ordering {
    let mut a = a.chars().peekable();
    let mut b = b.chars().peekable();
    loop {
        match (a.peek().copied(), b.peek().copied()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) if x.is_ascii_digit() && y.is_ascii_digit() => {
                let da = take_digits(&mut a);
                let db = take_digits(&mut b);
                let ta = da.trim_start_matches('0');
                let tb = db.trim_start_matches('0');
                let ord = ta
                    .len()
                    .cmp(&tb.len())
                    .then_with(|| ta.cmp(tb))
                    .then_with(|| da.len().cmp(&db.len()));
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            (Some(x), Some(y)) => {
                if x != y {
                    return x.cmp(&y);
                }
                a.next();
                b.next();
            }
        }
    }
}

fn take_digits(it: &mut Peekable<Chars<'_>>) -> String {
    let mut run = String::new();
    while let Some(c) = it.next_if(|c| c.is_ascii_digit()) {
        run.push(c);
    }
    run
}

/// Total order used for disambiguation and canonicalization: classes rank
/// `Null < Bool < Number < Str < Temporal < Composite < Object`, numbers
/// compare across `Int`/`Float` (ties put `Int` first), objects by id.
impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        use Value::*;
        match (self, other) {
            (Null, Null) => Ordering::Equal,
            (Bool(a), Bool(b)) => a.cmp(b),
            (Int(a), Int(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (Int(a), Float(b)) => cmp_int_float(*a, *b).then(Ordering::Less),
            (Float(a), Int(b)) => cmp_int_float(*b, *a).reverse().then(Ordering::Greater),
            (Str(a), Str(b)) => a.cmp(b),
            (Temporal(a), Temporal(b)) => a.cmp(b).then_with(|| {
                a.offset()
                    .local_minus_utc()
                    .cmp(&b.offset().local_minus_utc())
            }),
            (Composite(a), Composite(b)) => a.cmp(b),
            (Object(a), Object(b)) => a.id.cmp(&b.id),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Value {}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Str(s) => f.write_str(s),
            Value::Temporal(t) => f.write_str(&t.to_rfc3339_opts(SecondsFormat::AutoSi, false)),
            Value::Composite(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Value::Object(o) => write!(f, "#{}", o.id),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<u32> for Value {
    fn from(i: u32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<DateTime<FixedOffset>> for Value {
    fn from(t: DateTime<FixedOffset>) -> Self {
        Value::Temporal(t)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(t: DateTime<Utc>) -> Self {
        Value::Temporal(t.fixed_offset())
    }
}

/// Midnight UTC on the given day.
impl From<NaiveDate> for Value {
    fn from(d: NaiveDate) -> Self {
        Value::Temporal(d.and_time(NaiveTime::MIN).and_utc().fixed_offset())
    }
}

impl From<ObjectRef> for Value {
    fn from(o: ObjectRef) -> Self {
        Value::Object(o)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Composite(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}
