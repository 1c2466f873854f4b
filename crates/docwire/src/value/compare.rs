//! Total ordering, equality and hashing for [`BsonValue`].
//!
//! Values of different kinds compare by a fixed rank:
//!
//! | rank | wire types |
//! |---|---|
//! | 1 | MinKey |
//! | 2 | Undefined |
//! | 3 | Null |
//! | 4 | Double, Int32, Int64, Decimal128 |
//! | 5 | String, Symbol |
//! | 6 | Document |
//! | 7 | Array |
//! | 8 | Binary |
//! | 9 | ObjectId |
//! | 10 | Boolean |
//! | 11 | DateTime |
//! | 12 | Timestamp |
//! | 13 | RegularExpression |
//! | 14 | JavaScript |
//! | 15 | MaxKey |
//!
//! Inside rank 4, numbers compare by exact numeric value with NaN below every
//! other number and Decimal128 above them (decimals compare byte-wise among
//! themselves). Inside rank 5, strings and symbols compare by text. When two
//! values of the same rank are otherwise equal but have different wire types
//! the type byte decides, so `Int32(1)` and `Double(1.0)` are ordered and not
//! equal. Equality is exactly `cmp == Equal`.

use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

use super::BsonValue;

/// Position of a value's wire type in the cross-type order.
pub fn sort_rank(value: &BsonValue) -> u8 {
    match value {
        BsonValue::MinKey => 1,
        BsonValue::Undefined => 2,
        BsonValue::Null => 3,
        BsonValue::Double(_)
        | BsonValue::Int32(_)
        | BsonValue::Int64(_)
        | BsonValue::Decimal128(_) => 4,
        BsonValue::String(_) | BsonValue::Symbol(_) => 5,
        BsonValue::Document(_) => 6,
        BsonValue::Array(_) => 7,
        BsonValue::Binary(_) => 8,
        BsonValue::ObjectId(_) => 9,
        BsonValue::Boolean(_) => 10,
        BsonValue::DateTime(_) => 11,
        BsonValue::Timestamp(_) => 12,
        BsonValue::RegularExpression { .. } => 13,
        BsonValue::JavaScript(_) => 14,
        BsonValue::MaxKey => 15,
    }
}

enum Number<'a> {
    NaN,
    Int(i64),
    Float(f64),
    Decimal(&'a [u8; 16]),
}

fn number(value: &BsonValue) -> Option<Number<'_>> {
    Some(match value {
        BsonValue::Double(v) if v.is_nan() => Number::NaN,
        BsonValue::Double(v) => Number::Float(*v),
        BsonValue::Int32(v) => Number::Int(i64::from(*v)),
        BsonValue::Int64(v) => Number::Int(*v),
        BsonValue::Decimal128(bytes) => Number::Decimal(bytes),
        _ => return None,
    })
}

// 2^63 is exactly representable; every finite f64 at or above it exceeds any i64.
const TWO_POW_63: f64 = 9_223_372_036_854_775_808.0;

fn cmp_int_float(i: i64, f: f64) -> Ordering {
    if f >= TWO_POW_63 {
        return Ordering::Less;
    }
    if f < -TWO_POW_63 {
        return Ordering::Greater;
    }
    let whole = f.trunc();
    match i.cmp(&(whole as i64)) {
        Ordering::Equal => {
            if f > whole {
                Ordering::Less
            } else if f < whole {
                Ordering::Greater
            } else {
                Ordering::Equal
            }
        }
        other => other,
    }
}

fn cmp_numbers(a: &Number<'_>, b: &Number<'_>) -> Ordering {
    use Number::*;
    match (a, b) {
        (Decimal(x), Decimal(y)) => x.cmp(y),
        (Decimal(_), _) => Ordering::Greater,
        (_, Decimal(_)) => Ordering::Less,
        (NaN, NaN) => Ordering::Equal,
        (NaN, _) => Ordering::Less,
        (_, NaN) => Ordering::Greater,
        (Int(x), Int(y)) => x.cmp(y),
        (Float(x), Float(y)) => x.partial_cmp(y).unwrap_or(Ordering::Equal),
        (Int(x), Float(y)) => cmp_int_float(*x, *y),
        (Float(x), Int(y)) => cmp_int_float(*y, *x).reverse(),
    }
}

fn cmp_same_rank(a: &BsonValue, b: &BsonValue) -> Ordering {
    use BsonValue::*;
    if let (Some(x), Some(y)) = (number(a), number(b)) {
        return cmp_numbers(&x, &y);
    }
    match (a, b) {
        (String(x) | Symbol(x), String(y) | Symbol(y)) => x.cmp(y),
        (Document(x), Document(y)) => x.cmp(y),
        (Array(x), Array(y)) => x.iter().cmp(y.iter()),
        (Binary(x), Binary(y)) => x.cmp(y),
        (ObjectId(x), ObjectId(y)) => x.cmp(y),
        (Boolean(x), Boolean(y)) => x.cmp(y),
        (DateTime(x), DateTime(y)) => x.cmp(y),
        (Timestamp(x), Timestamp(y)) => x.to_u64().cmp(&y.to_u64()),
        (
            RegularExpression {
                pattern: xp,
                options: xo,
            },
            RegularExpression {
                pattern: yp,
                options: yo,
            },
        ) => xp.cmp(yp).then_with(|| xo.cmp(yo)),
        (JavaScript(x), JavaScript(y)) => x.cmp(y),
        // MinKey, MaxKey, Undefined, Null: a single value per rank.
        _ => Ordering::Equal,
    }
}

impl Ord for BsonValue {
    fn cmp(&self, other: &Self) -> Ordering {
        sort_rank(self)
            .cmp(&sort_rank(other))
            .then_with(|| cmp_same_rank(self, other))
            .then_with(|| self.bson_type().to_u8().cmp(&other.bson_type().to_u8()))
    }
}

impl PartialOrd for BsonValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for BsonValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for BsonValue {}

fn hash_f64<H: Hasher>(v: f64, state: &mut H) {
    let canonical = if v.is_nan() {
        f64::NAN
    } else if v == 0.0 {
        0.0
    } else {
        v
    };
    state.write_u64(canonical.to_bits());
}

impl Hash for BsonValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        if let BsonValue::Binary(b) = self {
            return b.hash(state);
        }
        self.bson_type().hash(state);
        match self {
            BsonValue::Double(v) => hash_f64(*v, state),
            BsonValue::String(s) | BsonValue::Symbol(s) | BsonValue::JavaScript(s) => s.hash(state),
            BsonValue::Document(d) => {
                state.write_usize(d.len());
                for (name, value) in d.iter() {
                    name.hash(state);
                    value.hash(state);
                }
            }
            BsonValue::Array(a) => a.hash(state),
            BsonValue::ObjectId(id) => id.hash(state),
            BsonValue::Boolean(v) => v.hash(state),
            BsonValue::DateTime(v) | BsonValue::Int64(v) => v.hash(state),
            BsonValue::RegularExpression { pattern, options } => {
                pattern.hash(state);
                options.hash(state);
            }
            BsonValue::Int32(v) => v.hash(state),
            BsonValue::Timestamp(ts) => ts.hash(state),
            BsonValue::Decimal128(bytes) => bytes.hash(state),
            BsonValue::Binary(_)
            | BsonValue::Undefined
            | BsonValue::Null
            | BsonValue::MinKey
            | BsonValue::MaxKey => {}
        }
    }
}

impl PartialEq for super::BsonDocument {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for super::BsonDocument {}

impl PartialOrd for super::BsonDocument {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for super::BsonDocument {
    fn cmp(&self, other: &Self) -> Ordering {
        self.elements()
            .iter()
            .map(|(n, v)| (n.as_str(), v))
            .cmp(other.elements().iter().map(|(n, v)| (n.as_str(), v)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::BsonDocument;
    use std::collections::hash_map::DefaultHasher;

    fn hash_of(v: &BsonValue) -> u64 {
        let mut h = DefaultHasher::new();
        v.hash(&mut h);
        h.finish()
    }

    #[test]
    fn ranks_order_kinds() {
        let mut values = vec![
            BsonValue::MaxKey,
            BsonValue::Boolean(false),
            BsonValue::String("a".into()),
            BsonValue::Null,
            BsonValue::Int32(100),
            BsonValue::MinKey,
        ];
        values.sort();
        assert_eq!(
            values,
            vec![
                BsonValue::MinKey,
                BsonValue::Null,
                BsonValue::Int32(100),
                BsonValue::String("a".into()),
                BsonValue::Boolean(false),
                BsonValue::MaxKey,
            ]
        );
    }

    #[test]
    fn numbers_compare_across_types() {
        assert!(BsonValue::Int32(1) < BsonValue::Double(1.5));
        assert!(BsonValue::Double(2.5) < BsonValue::Int64(3));
        assert!(BsonValue::Double(f64::NAN) < BsonValue::Double(f64::NEG_INFINITY));
        assert!(BsonValue::Double(f64::INFINITY) < BsonValue::Decimal128([0; 16]));
        assert!(BsonValue::Int64(i64::MAX) < BsonValue::Double(TWO_POW_63));
    }

    #[test]
    fn same_number_different_types_are_not_equal() {
        let a = BsonValue::Int32(1);
        let b = BsonValue::Double(1.0);
        assert_ne!(a, b);
        assert_eq!(a.cmp(&b), b.cmp(&a).reverse());
    }

    #[test]
    fn nan_and_signed_zero() {
        assert_eq!(BsonValue::Double(f64::NAN), BsonValue::Double(-f64::NAN));
        assert_eq!(BsonValue::Double(0.0), BsonValue::Double(-0.0));
        assert_eq!(
            hash_of(&BsonValue::Double(0.0)),
            hash_of(&BsonValue::Double(-0.0))
        );
        assert_eq!(
            hash_of(&BsonValue::Double(f64::NAN)),
            hash_of(&BsonValue::Double(-f64::NAN))
        );
    }

    #[test]
    fn documents_compare_elementwise_then_length() {
        let short: BsonDocument = [("a", 1)].into_iter().collect();
        let long: BsonDocument = [("a", 1), ("b", 0)].into_iter().collect();
        let bigger: BsonDocument = [("a", 2)].into_iter().collect();
        assert!(short < long);
        assert!(long < bigger);
    }
}
