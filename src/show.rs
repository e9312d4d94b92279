use itertools::Itertools;

/// Helper trait which can be used to display states, symbols, guards and words.
pub trait Show {
    /// Returns a human readable representation of `self`. For a state index that should be
    /// for example `q0`, for a transition `(q0, a, q1)`. Just use something that makes sense,
    /// this is mainly used for error messages and logging.
    fn show(&self) -> String;

    /// Show a collection of the thing, for a collection of states this should be `{q0, q1, q2}`.
    /// Symbol types may override this to render a word instead.
    fn show_collection<'a, I>(iter: I) -> String
    where
        Self: 'a,
        I: IntoIterator<Item = &'a Self>,
    {
        format!("{{{}}}", iter.into_iter().map(|x| x.show()).join(", "))
    }
}

macro_rules! impl_show_for_integers {
    ($($ty:ty),*) => {
        $(
            impl Show for $ty {
                fn show(&self) -> String {
                    self.to_string()
                }
                fn show_collection<'a, I>(iter: I) -> String
                where
                    Self: 'a,
                    I: IntoIterator<Item = &'a Self>,
                {
                    format!("[{}]", iter.into_iter().map(|x| x.show()).join(", "))
                }
            }
        )*
    }
}
impl_show_for_integers!(u8, u16, u32, u64, usize, i8, i16, i32, i64, isize);

impl Show for char {
    fn show(&self) -> String {
        self.to_string()
    }

    fn show_collection<'a, I: IntoIterator<Item = &'a Self>>(iter: I) -> String
    where
        Self: 'a,
    {
        format!(
            "\"{}\"",
            iter.into_iter().map(|sym| sym.to_string()).join("")
        )
    }
}

impl Show for String {
    fn show(&self) -> String {
        self.clone()
    }
}

impl Show for bool {
    fn show(&self) -> String {
        match self {
            true => "+",
            false => "-",
        }
        .to_string()
    }
}

impl<S: Show> Show for [S] {
    fn show(&self) -> String {
        S::show_collection(self.iter())
    }
}

impl<S: Show> Show for Vec<S> {
    fn show(&self) -> String {
        S::show_collection(self.iter())
    }
}

impl<S: Show, T: Show> Show for (S, T) {
    fn show(&self) -> String {
        format!("({}, {})", self.0.show(), self.1.show())
    }
}

impl<S: Show, T: Show, U: Show> Show for (S, T, U) {
    fn show(&self) -> String {
        format!("({}, {}, {})", self.0.show(), self.1.show(), self.2.show())
    }
}

impl<S: Show> Show for std::collections::BTreeSet<S> {
    fn show(&self) -> String {
        format!("{{{}}}", self.iter().map(|x| x.show()).join(", "))
    }
}

impl<S: Show> Show for Option<S> {
    fn show(&self) -> String {
        match self {
            None => "-".to_string(),
            Some(x) => x.show(),
        }
    }
}

impl<S: Show + ?Sized> Show for &S {
    fn show(&self) -> String {
        S::show(*self)
    }
}

#[cfg(test)]
mod tests {
    use super::Show;

    #[test]
    fn words_and_collections() {
        assert_eq!(vec!['a', 'b', 'a'].show(), "\"aba\"");
        assert_eq!(vec![1usize, 2].show(), "[1, 2]");
        assert_eq!((3usize, 'a', 4usize).show(), "(3, a, 4)");
        assert_eq!(Some(true).show(), "+");
        assert_eq!(std::collections::BTreeSet::from([2usize, 0]).show(), "{0, 2}");
    }
}
