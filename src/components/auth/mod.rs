//! Auth forms: login and signup.

mod login_view;
mod signup_view;

pub use login_view::LoginView;
pub use signup_view::SignupView;
