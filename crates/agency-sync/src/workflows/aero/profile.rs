use super::mapping::AeroRow;
use crate::workflows::masking::{GenderEncoding, MaskField, PrivacyMask};
use crate::workflows::normalizer::{convert_date, pad_tab_number};
use crate::workflows::rejections::RecordRejection;

/// Citizenship whose primary document is the national passport.
const HOME_CITIZENSHIP: &str = "RU";

/// Shorter expiry values are placeholders from the extract.
const MIN_EXPIRY_LEN: usize = 3;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocalizedName {
    pub russian: Option<String>,
    pub english: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    NationalPassport,
    InternationalPassport,
}

impl DocumentKind {
    pub fn as_str(self) -> &'static str {
        match self {
            DocumentKind::NationalPassport => "NationalPassport",
            DocumentKind::InternationalPassport => "InternationalPassport",
        }
    }

    fn other(self) -> Self {
        match self {
            DocumentKind::NationalPassport => DocumentKind::InternationalPassport,
            DocumentKind::InternationalPassport => DocumentKind::NationalPassport,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TravelDocument {
    pub kind: DocumentKind,
    pub series: String,
    pub number: String,
    pub issued_on: String,
    /// `None` is written as a nil element.
    pub expires_on: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub citizenship: String,
}

/// One `profile` element, already masked and date-converted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AeroProfile {
    pub unique_identifier: String,
    pub company_unique_identifier: String,
    pub first_name: LocalizedName,
    pub middle_name: LocalizedName,
    pub last_name: LocalizedName,
    pub gender: String,
    pub date_of_birth: String,
    /// Fixed identifier/value pairs under `analytics/properties`.
    pub properties: Vec<(&'static str, Option<String>)>,
    pub work_email: Option<String>,
    pub document: Option<TravelDocument>,
}

pub struct ProfileBuilder<'a> {
    mask: &'a PrivacyMask,
}

impl<'a> ProfileBuilder<'a> {
    pub fn new(mask: &'a PrivacyMask) -> Self {
        Self { mask }
    }

    pub fn build(&self, row: &AeroRow, company_id: &str) -> Result<AeroProfile, RecordRejection> {
        let mask = self.mask;
        let tab_number = pad_tab_number(row.tab_number.as_deref().unwrap_or_default());
        let reject = |concept: &str| {
            RecordRejection::new(tab_number.clone(), format!("problem with {concept}"))
        };

        let birthday = row.birthday.as_deref().ok_or_else(|| reject("birth date"))?;
        let gender = row.gender.as_deref().ok_or_else(|| reject("gender"))?;
        let citizenship = row
            .citizenship
            .as_deref()
            .ok_or_else(|| reject("citizenship"))?;
        let (Some(grade), Some(position), Some(department), Some(division)) = (
            row.grade.as_deref(),
            row.position.as_deref(),
            row.department.as_deref(),
            row.division.as_deref(),
        ) else {
            return Err(reject("org structure"));
        };

        let date_of_birth = convert_date(&mask.apply(MaskField::Birthday, birthday))
            .ok_or_else(|| reject("birth date"))?;
        let gender = if gender == "m" {
            GenderEncoding::TitleCase.male()
        } else {
            GenderEncoding::TitleCase.female()
        };
        let masked_tab = mask.apply(MaskField::TabNumber, &tab_number);

        Ok(AeroProfile {
            unique_identifier: masked_tab.clone(),
            company_unique_identifier: company_id.to_string(),
            first_name: LocalizedName {
                russian: mask.apply_opt(MaskField::RuName, row.ru_name.as_deref()),
                english: mask.apply_opt(MaskField::EnName, row.en_name.as_deref()),
            },
            middle_name: LocalizedName {
                russian: mask.apply_opt(MaskField::RuMiddleName, row.ru_middle_name.as_deref()),
                english: None,
            },
            last_name: LocalizedName {
                russian: mask.apply_opt(MaskField::RuSurname, row.ru_surname.as_deref()),
                english: mask.apply_opt(MaskField::EnSurname, row.en_surname.as_deref()),
            },
            gender: mask.apply(MaskField::Gender, gender),
            date_of_birth,
            properties: vec![
                ("Employee ID", Some(masked_tab)),
                ("GRADE", Some(grade.to_string())),
                ("Position", Some(position.to_string())),
                ("Department", Some(department.to_string())),
                ("Structural division", Some(division.to_string())),
                ("Cost Center", row.cost_center.clone()),
                (
                    "Line manager email",
                    mask.apply_opt(MaskField::OtherEmail, row.manager_email.as_deref()),
                ),
            ],
            work_email: mask.apply_opt(MaskField::Email, row.email.as_deref()),
            document: self.document(row, citizenship),
        })
    }

    /// Primary kind by citizenship, the other kind when the primary is incomplete.
    fn document(&self, row: &AeroRow, citizenship: &str) -> Option<TravelDocument> {
        let primary = if citizenship == HOME_CITIZENSHIP {
            DocumentKind::NationalPassport
        } else {
            DocumentKind::InternationalPassport
        };

        self.document_of_kind(row, primary, citizenship)
            .or_else(|| {
                tracing::debug!(
                    kind = primary.as_str(),
                    "primary document incomplete, trying the other kind"
                );
                self.document_of_kind(row, primary.other(), citizenship)
            })
    }

    fn document_of_kind(
        &self,
        row: &AeroRow,
        kind: DocumentKind,
        citizenship: &str,
    ) -> Option<TravelDocument> {
        let mask = self.mask;
        match kind {
            DocumentKind::NationalPassport => {
                let series = row.ru_series.as_deref()?;
                let number = row.ru_number.as_deref()?;
                let issued = row.ru_issue_date.as_deref()?;
                Some(TravelDocument {
                    kind,
                    series: series.to_string(),
                    number: mask.apply(MaskField::RuCardNumber, number),
                    issued_on: convert_date(&mask.apply(MaskField::RuIssueDate, issued))?,
                    expires_on: None,
                    first_name: mask.apply_opt(MaskField::RuName, row.ru_name.as_deref()),
                    last_name: mask.apply_opt(MaskField::RuSurname, row.ru_surname.as_deref()),
                    citizenship: citizenship.to_string(),
                })
            }
            DocumentKind::InternationalPassport => {
                let series = row.en_series.as_deref()?;
                let number = row.en_number.as_deref()?;
                let issued = row.en_issue_date.as_deref()?;
                let expires_on = row
                    .en_expire_date
                    .as_deref()
                    .filter(|value| value.chars().count() >= MIN_EXPIRY_LEN)
                    .and_then(|value| convert_date(&mask.apply(MaskField::EnExpireDate, value)));
                Some(TravelDocument {
                    kind,
                    series: series.to_string(),
                    number: mask.apply(MaskField::EnCardNumber, number),
                    issued_on: convert_date(&mask.apply(MaskField::EnIssueDate, issued))?,
                    expires_on,
                    first_name: mask.apply_opt(MaskField::EnName, row.en_name.as_deref()),
                    last_name: mask.apply_opt(MaskField::EnSurname, row.en_surname.as_deref()),
                    citizenship: citizenship.to_string(),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::masking::GenderEncoding;

    fn row() -> AeroRow {
        let value = |text: &str| Some(text.to_string());
        AeroRow {
            ru_surname: value("Петров"),
            ru_name: value("Иван"),
            ru_middle_name: value("Сергеевич"),
            en_surname: value("Petrov"),
            en_name: value("Ivan"),
            citizenship: value("RU"),
            gender: value("m"),
            birthday: value("05.03.1984"),
            ru_series: value("4510"),
            ru_number: value("123456"),
            ru_issue_date: value("12.04.2004"),
            en_series: value("75"),
            en_number: value("1234567"),
            en_issue_date: value("01.02.2019"),
            en_expire_date: value("01.02.2029"),
            email: value("ivan.petrov@corp.example"),
            tab_number: value("12"),
            grade: value("G7"),
            position: value("Analyst"),
            department: value("Finance"),
            division: value("Reporting"),
            cost_center: value("CC-100"),
            manager_email: value("boss@corp.example"),
        }
    }

    fn build(row: &AeroRow, masked: bool) -> Result<AeroProfile, RecordRejection> {
        let mask = PrivacyMask::new(masked, GenderEncoding::TitleCase);
        ProfileBuilder::new(&mask).build(row, "NESTLE_RUSSIA")
    }

    #[test]
    fn russian_citizen_gets_national_passport_without_expiry() {
        let profile = build(&row(), false).expect("valid row");
        assert_eq!(profile.unique_identifier, "00000012");
        assert_eq!(profile.company_unique_identifier, "NESTLE_RUSSIA");
        assert_eq!(profile.gender, "Male");
        assert_eq!(profile.date_of_birth, "1984-03-05");

        let document = profile.document.expect("document");
        assert_eq!(document.kind, DocumentKind::NationalPassport);
        assert_eq!(document.series, "4510");
        assert_eq!(document.issued_on, "2004-04-12");
        assert_eq!(document.expires_on, None);
        assert_eq!(document.first_name.as_deref(), Some("Иван"));
    }

    #[test]
    fn foreign_citizen_gets_international_passport() {
        let mut row = row();
        row.citizenship = Some("KZ".to_string());
        row.gender = Some("f".to_string());

        let profile = build(&row, false).expect("valid row");
        assert_eq!(profile.gender, "Female");
        assert_eq!(build(&row, true).expect("valid row").gender, "Male");
        let document = profile.document.expect("document");
        assert_eq!(document.kind, DocumentKind::InternationalPassport);
        assert_eq!(document.expires_on.as_deref(), Some("2029-02-01"));
        assert_eq!(document.last_name.as_deref(), Some("Petrov"));
        assert_eq!(document.citizenship, "KZ");
    }

    #[test]
    fn incomplete_primary_falls_back_to_other_kind() {
        let mut row = row();
        row.ru_issue_date = None;
        let document = build(&row, false)
            .expect("valid row")
            .document
            .expect("fallback document");
        assert_eq!(document.kind, DocumentKind::InternationalPassport);

        let mut row = self::row();
        row.citizenship = Some("BY".to_string());
        row.en_number = None;
        let document = build(&row, false)
            .expect("valid row")
            .document
            .expect("fallback document");
        assert_eq!(document.kind, DocumentKind::NationalPassport);
    }

    #[test]
    fn no_complete_document_means_none() {
        let mut row = row();
        row.ru_series = None;
        row.en_series = None;
        assert!(build(&row, false).expect("valid row").document.is_none());
    }

    #[test]
    fn short_expiry_is_treated_as_absent() {
        let mut row = row();
        row.citizenship = Some("KZ".to_string());
        row.en_expire_date = Some("-".to_string());
        let document = build(&row, false).expect("valid").document.expect("document");
        assert_eq!(document.expires_on, None);
    }

    fn assert_rejected(mutate: impl FnOnce(&mut AeroRow), reason: &str) {
        let mut row = row();
        mutate(&mut row);
        let rejection = build(&row, false).expect_err(reason);
        assert_eq!(rejection.reason, reason);
        assert_eq!(rejection.to_string(), format!("00000012 - {reason}"));
    }

    #[test]
    fn missing_mandatory_fields_name_the_concept() {
        assert_rejected(|row| row.birthday = None, "problem with birth date");
        assert_rejected(|row| row.gender = None, "problem with gender");
        assert_rejected(|row| row.citizenship = None, "problem with citizenship");
        assert_rejected(|row| row.division = None, "problem with org structure");
        assert_rejected(
            |row| row.birthday = Some("not a date".to_string()),
            "problem with birth date",
        );
    }

    #[test]
    fn masking_covers_identity_but_not_org_structure() {
        let profile = build(&row(), true).expect("valid row");
        assert_eq!(profile.unique_identifier, "00001234");
        assert_eq!(profile.date_of_birth, "2001-01-01");
        assert_eq!(profile.first_name.russian.as_deref(), Some("Торин"));
        assert_eq!(profile.last_name.english.as_deref(), Some("Oakenshield"));
        assert_eq!(profile.work_email.as_deref(), Some("thorin@somemail.ru"));
        assert_eq!(
            profile.properties[6].1.as_deref(),
            Some("gendalf@somemail.ru")
        );
        assert_eq!(profile.properties[2], ("Position", Some("Analyst".to_string())));
        assert_eq!(profile.properties[5], ("Cost Center", Some("CC-100".to_string())));

        let document = profile.document.expect("document");
        assert_eq!(document.number, "1234567890");
        assert_eq!(document.issued_on, "2010-12-31");
        assert_eq!(document.series, "4510");
    }
}
