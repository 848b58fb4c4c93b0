pub mod artwork;
pub mod card;
pub mod portfolio;
pub mod price;
pub mod set;

pub use artwork::*;
pub use card::*;
pub use portfolio::*;
pub use price::*;
pub use set::*;
