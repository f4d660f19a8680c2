use std::sync::LazyLock;

use regex::Regex;

use crate::models::{ForgotPassword, Pricing, Submission};

use super::rules::{FileChain, ListChain, TextChain};
use super::{IssueCollector, RawValue, Schema, ValidationError, expect_object};

pub const ACCEPTED_IMAGE_TYPES: &[&str] = &["image/jpeg", "image/png", "image/webp"];
pub const MAX_LOGO_SIZE_IN_BYTES: u64 = 2 * 1024 * 1024;
pub const MAX_SCREENSHOT_SIZE_IN_BYTES: u64 = 5 * 1024 * 1024;
pub const MAX_TAGLINE_WORDS: usize = 20;
pub const MAX_DESCRIPTION_WORDS: usize = 500;
pub const MAX_CATEGORIES: usize = 3;

const WEBSITE_PATTERN: &str = r"^(https?://)?(www\.)?[-a-zA-Z0-9@:%._+~#=]{1,256}\.[a-zA-Z0-9()]{1,6}\b([-a-zA-Z0-9()@:%_+.~#?&/=]*)$";
const EMAIL_PATTERN: &str = r"^[^@\s]+@[^@\s]+$";
const INVALID_PRICING: &str = "Invalid pricing option selected.";
const INVALID_IMAGE_TYPE: &str = "Invalid file type. Only JPG, PNG and WebP are accepted.";

pub static TOOL_SUBMISSION: LazyLock<ToolSubmissionSchema> = LazyLock::new(ToolSubmissionSchema::new);
pub static FORGOT_PASSWORD: LazyLock<ForgotPasswordSchema> = LazyLock::new(ForgotPasswordSchema::new);

fn mb(bytes: u64) -> String {
    format!("{}MB", bytes / 1024 / 1024)
}

pub struct ToolSubmissionSchema {
    name: TextChain,
    website: TextChain,
    tagline: TextChain,
    description: TextChain,
    categories: ListChain,
    pricing: TextChain,
    logo: FileChain,
    homepage_screenshot: FileChain,
}

impl ToolSubmissionSchema {
    pub fn new() -> Self {
        Self {
            name: TextChain::trimmed().non_empty("Name is required."),
            website: TextChain::trimmed()
                .non_empty("Website URL is required.")
                .pattern(
                    Regex::new(WEBSITE_PATTERN).unwrap(),
                    "Please enter a valid website URL.",
                ),
            tagline: TextChain::trimmed()
                .non_empty("A tagline is required.")
                .max_words(
                    MAX_TAGLINE_WORDS,
                    format!("Tagline must be {MAX_TAGLINE_WORDS} words or fewer."),
                ),
            description: TextChain::trimmed()
                .non_empty("Please enter a description.")
                .max_words(
                    MAX_DESCRIPTION_WORDS,
                    format!("Description must be {MAX_DESCRIPTION_WORDS} words or fewer."),
                ),
            categories: ListChain::of(
                TextChain::trimmed().non_empty("Category name can't be empty."),
            )
            .min_items(1, "Please select/create at least one category.")
            .max_items(
                MAX_CATEGORIES,
                "You can select a maximum of three categories.",
            ),
            pricing: TextChain::trimmed().non_empty("Please select a pricing model."),
            logo: FileChain::optional()
                .mime_type(ACCEPTED_IMAGE_TYPES, INVALID_IMAGE_TYPE)
                .max_size(
                    MAX_LOGO_SIZE_IN_BYTES,
                    format!(
                        "Logo file size must not exceed {}.",
                        mb(MAX_LOGO_SIZE_IN_BYTES)
                    ),
                ),
            homepage_screenshot: FileChain::required("A homepage screenshot is required.")
                .mime_type(ACCEPTED_IMAGE_TYPES, INVALID_IMAGE_TYPE)
                .max_size(
                    MAX_SCREENSHOT_SIZE_IN_BYTES,
                    format!(
                        "Screenshot file size must not exceed {}.",
                        mb(MAX_SCREENSHOT_SIZE_IN_BYTES)
                    ),
                ),
        }
    }
}

impl Default for ToolSubmissionSchema {
    fn default() -> Self {
        Self::new()
    }
}

impl Schema for ToolSubmissionSchema {
    type Output = Submission;

    fn decode(&self, input: &RawValue) -> Result<Submission, ValidationError> {
        let fields = expect_object(input)?;
        let mut issues = IssueCollector::new();

        let name = issues.field("name", self.name.decode(fields.get("name")));
        let website = issues.field("website", self.website.decode(fields.get("website")));
        let tagline = issues.field("tagline", self.tagline.decode(fields.get("tagline")));
        let description = issues.field(
            "description",
            self.description.decode(fields.get("description")),
        );
        let categories = self
            .categories
            .decode("categories", fields.get("categories"), &mut issues);
        let pricing = issues.field(
            "pricing",
            self.pricing.decode(fields.get("pricing")).and_then(|p| {
                Pricing::parse(&p).ok_or_else(|| INVALID_PRICING.to_string())
            }),
        );
        let logo = issues.field("logo", self.logo.decode(fields.get("logo")));
        let homepage_screenshot = issues.field(
            "homepageScreenshot",
            self.homepage_screenshot
                .decode(fields.get("homepageScreenshot")),
        );

        let (
            Some(name),
            Some(website),
            Some(tagline),
            Some(description),
            Some(categories),
            Some(pricing),
            Some(logo),
            Some(Some(homepage_screenshot)),
        ) = (
            name,
            website,
            tagline,
            description,
            categories,
            pricing,
            logo,
            homepage_screenshot,
        )
        else {
            return Err(issues.into_error());
        };

        Ok(Submission {
            name,
            website,
            tagline,
            description,
            categories,
            pricing,
            logo,
            homepage_screenshot,
        })
    }
}

pub struct ForgotPasswordSchema {
    email: TextChain,
}

impl ForgotPasswordSchema {
    pub fn new() -> Self {
        Self {
            email: TextChain::trimmed()
                .non_empty("Email is required.")
                .pattern(
                    Regex::new(EMAIL_PATTERN).unwrap(),
                    "Please enter a valid email address.",
                ),
        }
    }
}

impl Default for ForgotPasswordSchema {
    fn default() -> Self {
        Self::new()
    }
}

impl Schema for ForgotPasswordSchema {
    type Output = ForgotPassword;

    fn decode(&self, input: &RawValue) -> Result<ForgotPassword, ValidationError> {
        let fields = expect_object(input)?;
        let mut issues = IssueCollector::new();

        let email = issues.field("email", self.email.decode(fields.get("email")));

        match email {
            Some(email) if issues.is_empty() => Ok(ForgotPassword { email }),
            _ => Err(issues.into_error()),
        }
    }
}
