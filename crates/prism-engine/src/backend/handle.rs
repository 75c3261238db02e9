use std::fmt;

macro_rules! handle {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
        pub struct $name {
            pub(crate) index: u32,
            pub(crate) generation: u32,
        }

        impl $name {
            pub(crate) const fn new(index: u32, generation: u32) -> Self {
                Self { index, generation }
            }

            /// Backend context generation this handle belongs to.
            pub fn generation(self) -> u32 {
                self.generation
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}#{}@{}", $prefix, self.index, self.generation)
            }
        }
    };
}

handle!(
    /// Device-side program.
    ProgramId,
    "program"
);
handle!(
    /// Device-resident vertex data.
    GeometryId,
    "geometry"
);
handle!(
    /// Device texture object, shared with a stream producer for streaming kinds.
    TextureId,
    "texture"
);
