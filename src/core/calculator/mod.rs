pub mod duration;
pub mod lunch;
pub mod roster;
pub mod timeline;

pub use lunch::{Boundary, Cmp, LunchSchedule};
pub use timeline::{Schedule, build_schedule};
