pub mod credits;
pub mod detail;
pub mod movie;
pub mod order;
pub mod page;
pub mod toast;
pub mod video;

pub use credits::{CastMember, Credits, CrewMember};
pub use detail::{AllMovieDetail, Genre, MovieDetail, ProductionCompany, ProductionCountry, SpokenLanguage};
pub use movie::Movie;
pub use order::{OrderDirection, OrderKey};
pub use page::MoviePage;
pub use toast::{Toast, ToastKind};
pub use video::Video;
