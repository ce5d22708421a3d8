pub mod model;

pub use model::{AppSession, NewUser, ProfileUpdate, SessionUser, User, UserPatch};
