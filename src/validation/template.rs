use serde::Deserialize;

use super::{optional_text, required_text, ValidationErrors, LONG_TEXT_MAX};
use crate::database::models::BriefingTemplateData;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BriefingTemplateForm {
    pub name: Option<String>,
    #[serde(default)]
    pub template_data: BriefingTemplateData,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BriefingTemplateInput {
    pub name: String,
    pub template_data: BriefingTemplateData,
}

impl BriefingTemplateForm {
    pub fn validate(self) -> Result<BriefingTemplateInput, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let name = required_text(&mut errors, "name", "Name", self.name, 100);

        let data = self.template_data;
        let mut field = |key: &str, label: &str, value: Option<String>| {
            optional_text(&mut errors, &format!("template_data.{}", key), label, value, LONG_TEXT_MAX)
        };
        let template_data = BriefingTemplateData {
            campaign_goal: field("campaign_goal", "Campaign goal", data.campaign_goal),
            target_audience: field("target_audience", "Target audience", data.target_audience),
            deliverables: field("deliverables", "Deliverables", data.deliverables),
            hashtags: field("hashtags", "Hashtags", data.hashtags),
            dos_donts: field("dos_donts", "Do's and don'ts", data.dos_donts),
            content_guidelines: field("content_guidelines", "Content guidelines", data.content_guidelines),
            compensation: field("compensation", "Compensation", data.compensation),
            notes: field("notes", "Notes", data.notes),
        };

        errors.finish(BriefingTemplateInput { name, template_data })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drops_blank_template_fields() {
        let form: BriefingTemplateForm = serde_json::from_value(serde_json::json!({
            "name": "Story package",
            "template_data": {"deliverables": "3 stories", "hashtags": " ", "notes": ""}
        }))
        .unwrap();

        let input = form.validate().unwrap();
        assert_eq!(input.name, "Story package");
        assert_eq!(
            serde_json::to_value(&input.template_data).unwrap(),
            serde_json::json!({"deliverables": "3 stories"})
        );
    }

    #[test]
    fn name_is_limited() {
        let errors = BriefingTemplateForm { name: Some("n".repeat(101)), ..Default::default() }
            .validate()
            .unwrap_err();
        assert!(errors.has("name"));
    }

    #[test]
    fn template_data_is_optional() {
        let form: BriefingTemplateForm = serde_json::from_str(r#"{"name": "Empty"}"#).unwrap();
        assert_eq!(form.validate().unwrap().template_data, BriefingTemplateData::default());
    }
}
