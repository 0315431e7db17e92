//! Macros for declaring records and validator maps inline
//!
//! These macros cut the boilerplate of building a `Record` field by field
//! and of registering rule constructors on a `ValidatorMap`.

/// Build a [`Record`](crate::core::field::Record) from `key => value` pairs.
///
/// Values go through `FieldValue::from`, so strings, numbers, booleans,
/// UUIDs, timestamps, records and validated objects can be used directly.
///
/// # Example
/// ```rust,ignore
/// let user = record! {
///     "id" => "123",
///     "created" => Utc::now(),
///     "name" => "jonathan",
/// };
/// ```
#[macro_export]
macro_rules! record {
    () => {
        $crate::core::field::Record::new()
    };
    ( $( $key:expr => $value:expr ),+ $(,)? ) => {{
        let mut record = $crate::core::field::Record::new();
        $(
            record.insert(
                ::std::string::String::from($key),
                $crate::core::field::FieldValue::from($value),
            );
        )+
        record
    }};
}

/// Build a [`ValidatorMap`](crate::core::validation::ValidatorMap) from rule
/// lists.
///
/// Each field takes a bracketed list of rules; all rules on a field must
/// accept. Available rules: `required`, `optional`, `positive`, `datetime`,
/// `object`, `changed`, `immutable`, `reject_all`, `string_length(min, max)`,
/// `min_length(n)`, `max_value(max)`, `in_list(a, b, ...)`,
/// `date_format(fmt)`, `format(FieldFormat)` and `validate(closure)`.
///
/// # Example
/// ```rust,ignore
/// let schema = validator_map! {
///     id: [min_length(3)],
///     name: [required, string_length(3, 50)],
///     email: [object],
///     score: [validate(|v: &FieldValue, _: &Record| v.as_integer().is_some())],
/// };
/// ```
#[macro_export]
macro_rules! validator_map {
    ( $( $field:ident : [ $( $rule:tt )* ] ),* $(,)? ) => {{
        #[allow(unused_mut)]
        let mut map = $crate::core::validation::ValidatorMap::new();
        $(
            $crate::add_rules_for_field!(map, stringify!($field), $( $rule )*);
        )*
        map
    }};
}

/// Helper macro to add rules to a field
#[macro_export]
macro_rules! add_rules_for_field {
    // Base case: empty
    ($map:ident, $field:expr $(,)?) => {};

    // required
    ($map:ident, $field:expr, required $(, $( $rest:tt )* )?) => {
        $map.add($field, $crate::core::validation::validators::required());
        $crate::add_rules_for_field!($map, $field, $( $( $rest )* )?);
    };

    // optional
    ($map:ident, $field:expr, optional $(, $( $rest:tt )* )?) => {
        $map.add($field, $crate::core::validation::validators::optional());
        $crate::add_rules_for_field!($map, $field, $( $( $rest )* )?);
    };

    // positive
    ($map:ident, $field:expr, positive $(, $( $rest:tt )* )?) => {
        $map.add($field, $crate::core::validation::validators::positive());
        $crate::add_rules_for_field!($map, $field, $( $( $rest )* )?);
    };

    // datetime
    ($map:ident, $field:expr, datetime $(, $( $rest:tt )* )?) => {
        $map.add($field, $crate::core::validation::validators::is_datetime());
        $crate::add_rules_for_field!($map, $field, $( $( $rest )* )?);
    };

    // object
    ($map:ident, $field:expr, object $(, $( $rest:tt )* )?) => {
        $map.add($field, $crate::core::validation::validators::object());
        $crate::add_rules_for_field!($map, $field, $( $( $rest )* )?);
    };

    // changed
    ($map:ident, $field:expr, changed $(, $( $rest:tt )* )?) => {
        $map.add($field, $crate::core::validation::validators::changed($field));
        $crate::add_rules_for_field!($map, $field, $( $( $rest )* )?);
    };

    // immutable
    ($map:ident, $field:expr, immutable $(, $( $rest:tt )* )?) => {
        $map.add($field, $crate::core::validation::validators::immutable($field));
        $crate::add_rules_for_field!($map, $field, $( $( $rest )* )?);
    };

    // reject_all
    ($map:ident, $field:expr, reject_all $(, $( $rest:tt )* )?) => {
        $map.add($field, $crate::core::validation::validators::reject_all());
        $crate::add_rules_for_field!($map, $field, $( $( $rest )* )?);
    };

    // string_length with parameters
    ($map:ident, $field:expr, string_length($min:expr, $max:expr) $(, $( $rest:tt )* )?) => {
        $map.add($field, $crate::core::validation::validators::string_length($min, $max));
        $crate::add_rules_for_field!($map, $field, $( $( $rest )* )?);
    };

    // min_length with parameter
    ($map:ident, $field:expr, min_length($min:expr) $(, $( $rest:tt )* )?) => {
        $map.add($field, $crate::core::validation::validators::min_length($min));
        $crate::add_rules_for_field!($map, $field, $( $( $rest )* )?);
    };

    // max_value with parameter
    ($map:ident, $field:expr, max_value($max:expr) $(, $( $rest:tt )* )?) => {
        $map.add($field, $crate::core::validation::validators::max_value($max));
        $crate::add_rules_for_field!($map, $field, $( $( $rest )* )?);
    };

    // in_list with values
    ($map:ident, $field:expr, in_list($( $value:expr ),* $(,)?) $(, $( $rest:tt )* )?) => {
        $map.add(
            $field,
            $crate::core::validation::validators::in_list(vec![$( $value.to_string() ),*]),
        );
        $crate::add_rules_for_field!($map, $field, $( $( $rest )* )?);
    };

    // date_format with format string
    ($map:ident, $field:expr, date_format($format:expr) $(, $( $rest:tt )* )?) => {
        $map.add($field, $crate::core::validation::validators::date_format($format));
        $crate::add_rules_for_field!($map, $field, $( $( $rest )* )?);
    };

    // format with a FieldFormat
    ($map:ident, $field:expr, format($format:expr) $(, $( $rest:tt )* )?) => {
        $map.add($field, $crate::core::validation::validators::format($format));
        $crate::add_rules_for_field!($map, $field, $( $( $rest )* )?);
    };

    // custom validator closure
    ($map:ident, $field:expr, validate($validator:expr) $(, $( $rest:tt )* )?) => {
        $map.add($field, $validator);
        $crate::add_rules_for_field!($map, $field, $( $( $rest )* )?);
    };
}
