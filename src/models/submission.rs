use std::fmt;

use serde::{Deserialize, Serialize};

use super::UploadedFile;

/// A tool listing that passed validation. Never built from unchecked input.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub name: String,
    pub website: String,
    pub tagline: String,
    pub description: String,
    pub categories: Vec<String>,
    pub pricing: Pricing,
    pub logo: Option<UploadedFile>,
    pub homepage_screenshot: UploadedFile,
}

impl Submission {
    pub fn primary_category(&self) -> Option<&str> {
        self.categories.first().map(String::as_str)
    }

    pub fn secondary_categories(&self) -> &[String] {
        self.categories.get(1..).unwrap_or(&[])
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Pricing {
    Free,
    Paid,
    Freemium,
}

impl Pricing {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Free" => Some(Pricing::Free),
            "Paid" => Some(Pricing::Paid),
            "Freemium" => Some(Pricing::Freemium),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Pricing::Free => "Free",
            Pricing::Paid => "Paid",
            Pricing::Freemium => "Freemium",
        }
    }
}

impl fmt::Display for Pricing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
