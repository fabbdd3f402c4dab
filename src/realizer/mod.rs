pub mod dates;
pub mod entities;
pub mod morphology;
pub mod numbers;
pub mod slots;
pub mod surface;

pub use dates::DateRealizer;
pub use entities::EntityNameResolver;
pub use morphology::{EnglishMorphology, MorphologicalRealizer, PassthroughMorphology};
pub use numbers::OrdinalRealizer;
pub use slots::{realize_slots, LookupRealizer, NumberRealizer, RegexRealizer};
pub use surface::{SurfaceFormat, SurfaceRealizer};
