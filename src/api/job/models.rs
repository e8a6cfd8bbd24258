use actix_multipart::form::{tempfile::TempFile, text::Text, MultipartForm};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Multipart body of an application
#[derive(MultipartForm)]
pub struct ApplicationForm {
    pub name: Text<String>,
    pub email: Text<String>,
    pub cover_letter: Option<Text<String>>,
    #[multipart(limit = "5MiB")]
    pub resume: Option<TempFile>,
}

/// Metadata of an uploaded resume; the file itself is discarded
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ResumeInfo {
    pub file_name: Option<String>,
    pub size: usize,
}

/// Application model for validating submissions
#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct Application {
    #[validate(length(
        min = 1,
        max = 100,
        message = "Name must be between 1 and 100 characters"
    ))]
    pub name: String,
    #[validate(email(message = "Email must be a valid address"))]
    pub email: String,
    #[validate(length(max = 5000, message = "Cover letter must be at most 5000 characters"))]
    pub cover_letter: Option<String>,
    pub resume: Option<ResumeInfo>,
}

impl From<ApplicationForm> for Application {
    fn from(form: ApplicationForm) -> Self {
        Application {
            name: form.name.into_inner().trim().to_string(),
            email: form.email.into_inner().trim().to_string(),
            cover_letter: form
                .cover_letter
                .map(Text::into_inner)
                .filter(|letter| !letter.trim().is_empty()),
            resume: form.resume.map(|file| ResumeInfo {
                file_name: file.file_name,
                size: file.size,
            }),
        }
    }
}

/// Body of a saved-jobs toggle
#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct ToggleSaved {
    #[validate(length(min = 1, max = 64, message = "Job id must be between 1 and 64 characters"))]
    pub id: String,
}
