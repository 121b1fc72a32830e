use serde::Deserialize;

use super::{optional_text, required_text, is_valid_website, ValidationErrors, LONG_TEXT_MAX};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompanyForm {
    pub name: Option<String>,
    pub industry: Option<String>,
    pub website: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompanyInput {
    pub name: String,
    pub industry: Option<String>,
    pub website: Option<String>,
    pub notes: Option<String>,
}

impl CompanyForm {
    pub fn validate(self) -> Result<CompanyInput, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let name = required_text(&mut errors, "name", "Name", self.name, 200);
        let industry = optional_text(&mut errors, "industry", "Industry", self.industry, 100);
        let website = optional_text(&mut errors, "website", "Website", self.website, 500);
        if let Some(site) = &website {
            if !is_valid_website(site) {
                errors.add("website", "Invalid URL");
            }
        }
        let notes = optional_text(&mut errors, "notes", "Notes", self.notes, LONG_TEXT_MAX);

        errors.finish(CompanyInput { name, industry, website, notes })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_minimal_company() {
        let input = CompanyForm { name: Some(" Acme GmbH ".into()), ..Default::default() }
            .validate()
            .unwrap();
        assert_eq!(input.name, "Acme GmbH");
        assert_eq!(input.website, None);
    }

    #[test]
    fn blank_optionals_become_none() {
        let input = CompanyForm {
            name: Some("Acme".into()),
            industry: Some("".into()),
            website: Some("  ".into()),
            notes: Some("".into()),
        }
        .validate()
        .unwrap();
        assert_eq!(input.industry, None);
        assert_eq!(input.website, None);
        assert_eq!(input.notes, None);
    }

    #[test]
    fn collects_all_field_errors() {
        let errors = CompanyForm {
            name: None,
            industry: Some("i".repeat(101)),
            website: Some("not a url".into()),
            notes: None,
        }
        .validate()
        .unwrap_err();

        assert!(errors.has("name"));
        assert!(errors.has("industry"));
        assert_eq!(errors.get("website"), ["Invalid URL"]);
    }
}
