use chrono::NaiveDate;
use serde::Deserialize;

use crate::errors::AppError;
use crate::models::customer::RenewalIntent;

const MAX_NAME_LEN: usize = 64;
const MAX_PHONE_LEN: usize = 20;

#[derive(Debug, Deserialize)]
pub struct NewCustomerRequest {
    pub name: String,
    pub phone: String,
    pub gender: String,
    pub project_type: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub renewal_intent: RenewalIntent,
}

/// Registration input after trimming and checks.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCustomer {
    pub name: String,
    pub phone: String,
    pub gender: String,
    pub project_type: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub notes: String,
    pub renewal_intent: RenewalIntent,
}

/// Body of `POST /api/customers/:id/renew`. Fields are optional so a missing
/// one is reported by name instead of as a generic JSON rejection.
#[derive(Debug, Deserialize)]
pub struct RenewRequest {
    pub project_type: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MembershipPeriod {
    pub project_type: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub notes: String,
}

fn required_text(field: &str, value: &str, max_len: usize) -> Result<String, AppError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::Validation(format!("{field} is required")));
    }
    if value.chars().count() > max_len {
        return Err(AppError::Validation(format!(
            "{field} must be at most {max_len} characters"
        )));
    }
    Ok(value.to_string())
}

fn validate_phone(phone: &str) -> Result<String, AppError> {
    let phone = required_text("phone", phone, MAX_PHONE_LEN)?;
    let well_formed = phone.chars().any(|c| c.is_ascii_digit())
        && phone
            .chars()
            .enumerate()
            .all(|(i, c)| c.is_ascii_digit() || c == '-' || (i == 0 && c == '+'));
    if !well_formed {
        return Err(AppError::Validation(format!(
            "phone '{phone}' may only contain digits, '-' and a leading '+'"
        )));
    }
    Ok(phone)
}

fn validate_period(start_date: NaiveDate, end_date: NaiveDate) -> Result<(), AppError> {
    if start_date > end_date {
        return Err(AppError::Validation(format!(
            "start_date {start_date} is after end_date {end_date}"
        )));
    }
    Ok(())
}

impl NewCustomerRequest {
    pub fn validate(self) -> Result<NewCustomer, AppError> {
        validate_period(self.start_date, self.end_date)?;
        Ok(NewCustomer {
            name: required_text("name", &self.name, MAX_NAME_LEN)?,
            phone: validate_phone(&self.phone)?,
            gender: required_text("gender", &self.gender, MAX_NAME_LEN)?,
            project_type: required_text("project_type", &self.project_type, MAX_NAME_LEN)?,
            start_date: self.start_date,
            end_date: self.end_date,
            notes: self.notes.trim().to_string(),
            renewal_intent: self.renewal_intent,
        })
    }
}

impl RenewRequest {
    pub fn validate(self) -> Result<MembershipPeriod, AppError> {
        let missing: Vec<&str> = [
            ("project_type", self.project_type.is_none()),
            ("start_date", self.start_date.is_none()),
            ("end_date", self.end_date.is_none()),
        ]
        .into_iter()
        .filter_map(|(field, absent)| absent.then_some(field))
        .collect();

        match (self.project_type, self.start_date, self.end_date) {
            (Some(project_type), Some(start_date), Some(end_date)) => {
                validate_period(start_date, end_date)?;
                Ok(MembershipPeriod {
                    project_type: required_text("project_type", &project_type, MAX_NAME_LEN)?,
                    start_date,
                    end_date,
                    notes: self.notes.trim().to_string(),
                })
            }
            _ => Err(AppError::Validation(format!(
                "missing required fields: {}",
                missing.join(", ")
            ))),
        }
    }
}

/// `ILIKE` pattern matching `term` as a literal substring.
pub fn contains_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.trim().chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}
