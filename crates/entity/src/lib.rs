pub mod user;
pub mod category;
pub mod tracking_item;
pub mod otp_credential;
pub mod job_run;

pub use user::Entity as User;
pub use category::Entity as Category;
pub use tracking_item::Entity as TrackingItem;
pub use otp_credential::Entity as OtpCredential;
pub use job_run::Entity as JobRun;
