use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::{normalize, optional_date, optional_text, required_text, ValidationErrors, LONG_TEXT_MAX};
use crate::database::models::BriefingTemplateData;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BriefingForm {
    pub campaign_goal: Option<String>,
    pub target_audience: Option<String>,
    pub deliverables: Option<String>,
    pub hashtags: Option<String>,
    pub dos_donts: Option<String>,
    pub content_guidelines: Option<String>,
    pub posting_period_start: Option<String>,
    pub posting_period_end: Option<String>,
    pub compensation: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BriefingInput {
    pub campaign_goal: String,
    pub target_audience: Option<String>,
    pub deliverables: Option<String>,
    pub hashtags: Option<String>,
    pub dos_donts: Option<String>,
    pub content_guidelines: Option<String>,
    pub posting_period_start: Option<DateTime<Utc>>,
    pub posting_period_end: Option<DateTime<Utc>>,
    pub compensation: Option<String>,
    pub notes: Option<String>,
}

impl BriefingForm {
    /// Fills fields the form leaves blank from a template
    pub fn with_template(self, template: &BriefingTemplateData) -> Self {
        fn pick(own: Option<String>, preset: &Option<String>) -> Option<String> {
            normalize(own).or_else(|| preset.clone())
        }

        Self {
            campaign_goal: pick(self.campaign_goal, &template.campaign_goal),
            target_audience: pick(self.target_audience, &template.target_audience),
            deliverables: pick(self.deliverables, &template.deliverables),
            hashtags: pick(self.hashtags, &template.hashtags),
            dos_donts: pick(self.dos_donts, &template.dos_donts),
            content_guidelines: pick(self.content_guidelines, &template.content_guidelines),
            compensation: pick(self.compensation, &template.compensation),
            notes: pick(self.notes, &template.notes),
            posting_period_start: self.posting_period_start,
            posting_period_end: self.posting_period_end,
        }
    }

    pub fn validate(self) -> Result<BriefingInput, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let campaign_goal = required_text(&mut errors, "campaign_goal", "Campaign goal", self.campaign_goal, LONG_TEXT_MAX);
        let target_audience =
            optional_text(&mut errors, "target_audience", "Target audience", self.target_audience, LONG_TEXT_MAX);
        let deliverables = optional_text(&mut errors, "deliverables", "Deliverables", self.deliverables, LONG_TEXT_MAX);
        let hashtags = optional_text(&mut errors, "hashtags", "Hashtags", self.hashtags, LONG_TEXT_MAX);
        let dos_donts = optional_text(&mut errors, "dos_donts", "Do's and don'ts", self.dos_donts, LONG_TEXT_MAX);
        let content_guidelines = optional_text(
            &mut errors,
            "content_guidelines",
            "Content guidelines",
            self.content_guidelines,
            LONG_TEXT_MAX,
        );
        let compensation = optional_text(&mut errors, "compensation", "Compensation", self.compensation, LONG_TEXT_MAX);
        let notes = optional_text(&mut errors, "notes", "Notes", self.notes, LONG_TEXT_MAX);

        let posting_period_start = optional_date(&mut errors, "posting_period_start", self.posting_period_start);
        let posting_period_end = optional_date(&mut errors, "posting_period_end", self.posting_period_end);
        if let (Some(start), Some(end)) = (posting_period_start, posting_period_end) {
            if end < start {
                errors.add("posting_period_end", "End date must not be before start date");
            }
        }

        errors.finish(BriefingInput {
            campaign_goal,
            target_audience,
            deliverables,
            hashtags,
            dos_donts,
            content_guidelines,
            posting_period_start,
            posting_period_end,
            compensation,
            notes,
        })
    }
}
