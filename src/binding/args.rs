//! Typed argument vectors
//!
//! A binding's arguments are a tuple. Each element is an [`Arg`]: plain values
//! are always present, `Option<T>` is a required slot that may not be known
//! yet (e.g. the logged-in user's id). A vector resolves only when every
//! slot is present; `0`, `false` and `""` are ordinary present values.

use crate::services::{ReportKind, Role};

/// One element of an argument vector
pub trait Arg: PartialEq + Send + Sync + 'static {
    /// What the remote call receives for this slot
    type Value: Send + 'static;

    /// `None` when the slot is required but absent
    fn resolve(&self) -> Option<Self::Value>;
}

impl<T> Arg for Option<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    type Value = T;

    fn resolve(&self) -> Option<T> {
        self.clone()
    }
}

macro_rules! always_present {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Arg for $ty {
                type Value = $ty;

                fn resolve(&self) -> Option<$ty> {
                    Some(self.clone())
                }
            }
        )*
    };
}

always_present!(i32, i64, u32, u64, usize, bool, String, &'static str, Role, ReportKind);

/// The ordered arguments of one remote call, also used as its dependency key
pub trait ArgumentVector: PartialEq + Send + Sync + 'static {
    /// The tuple handed to the remote call once every slot is present
    type Resolved: Send + 'static;

    fn resolve(&self) -> Option<Self::Resolved>;
}

impl ArgumentVector for () {
    type Resolved = ();

    fn resolve(&self) -> Option<()> {
        Some(())
    }
}

macro_rules! tuple_vector {
    ($($name:ident : $idx:tt),+) => {
        impl<$($name: Arg),+> ArgumentVector for ($($name,)+) {
            type Resolved = ($($name::Value,)+);

            fn resolve(&self) -> Option<Self::Resolved> {
                Some(($(self.$idx.resolve()?,)+))
            }
        }
    };
}

tuple_vector!(A: 0);
tuple_vector!(A: 0, B: 1);
tuple_vector!(A: 0, B: 1, C: 2);
tuple_vector!(A: 0, B: 1, C: 2, D: 3);
