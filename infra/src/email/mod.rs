//! Notifier implementations for delivering codes over email.

pub mod mock;
pub mod smtp;

pub use mock::MockNotifier;
pub use smtp::SmtpNotifier;

use cg_core::domain::entities::otp_session::OtpPurpose;

/// Subject line for a purpose
pub(crate) fn subject_for(purpose: OtpPurpose) -> &'static str {
    match purpose {
        OtpPurpose::EmailVerification => "Your email verification code",
        OtpPurpose::PasswordReset => "Your password reset code",
    }
}

/// Plain-text body carrying the code
pub(crate) fn body_for(purpose: OtpPurpose, code: &str) -> String {
    let action = match purpose {
        OtpPurpose::EmailVerification => "verify your email address",
        OtpPurpose::PasswordReset => "reset your password",
    };
    format!(
        "Your code to {} is: {}\n\n\
         It is valid for 10 minutes. Do not share it with anyone.\n\
         If you did not request this code, you can ignore this message.",
        action, code
    )
}
