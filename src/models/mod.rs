pub mod application;
pub mod finance;
pub mod scholarship;
pub mod session;
pub mod user;

pub use application::ApplicationStatus;
pub use user::Role;

#[allow(unused_imports)]
pub mod prelude {
    pub use super::application::{self, Entity as Application};
    pub use super::finance::{self, Entity as Finance};
    pub use super::scholarship::{self, Entity as Scholarship};
    pub use super::session::{self, Entity as Session};
    pub use super::user::{self, Entity as User};
}
