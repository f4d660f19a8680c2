pub mod forgot_password;
pub mod submission;
pub mod upload;

pub use forgot_password::ForgotPassword;
pub use submission::{Pricing, Submission};
pub use upload::UploadedFile;
