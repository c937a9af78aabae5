//! Patch structs for plain data types.
//!
//! `#[patronus(name = "FooUpdate")]` on a struct `Foo` generates `FooUpdate`
//! where every field is wrapped in an `Option`, builder style setters, and a
//! [`Patch`] implementation. Applying a patch keeps every field of the base
//! value that the patch leaves unset.

// lets the generated `::patronus::Patch` path resolve inside this crate's tests
extern crate self as patronus;

pub use patronus_macros::patronus;

pub trait Patch<T> {
    /// Returns `base` with every set field of the patch written over it.
    fn apply_to(self, base: &T) -> T;

    /// True when no field is set; applying it returns a copy of the base.
    fn is_empty(&self) -> bool;
}

#[cfg(test)]
mod tests {
    use super::{patronus, Patch};

    #[patronus(name = "PointUpdate", derives = "Default, Debug, Clone, PartialEq")]
    #[derive(Debug, Clone, PartialEq)]
    struct Point {
        label: String,
        x: i64,
        y: i64,
        note: Option<String>,
    }

    fn origin() -> Point {
        Point {
            label: "origin".into(),
            x: 0,
            y: 0,
            note: Some("start".into()),
        }
    }

    #[test]
    fn unset_fields_keep_base_values() {
        let patched = PointUpdate::default().set_x(4_i64).apply_to(&origin());

        assert_eq!(patched.x, 4);
        assert_eq!(patched.y, 0);
        assert_eq!(patched.label, "origin");
        assert_eq!(patched.note.as_deref(), Some("start"));
    }

    #[test]
    fn set_none_on_optional_field_clears_it() {
        let patched = PointUpdate::default()
            .set_note(None::<String>)
            .apply_to(&origin());

        assert_eq!(patched.note, None);
    }

    #[test]
    fn unset_reverts_a_setter() {
        let update = PointUpdate::default().set_label("moved").unset_label();

        assert!(update.is_empty());
        assert_eq!(update.apply_to(&origin()), origin());
    }

    #[test]
    fn set_opt_accepts_optional_values() {
        let update = PointUpdate::default()
            .set_opt_y(Some(9_i64))
            .set_opt_x(None::<i64>);

        assert!(!update.is_empty());
        let patched = update.apply_to(&origin());
        assert_eq!((patched.x, patched.y), (0, 9));
    }
}
