use serde::Serialize;

use super::mapping::TravelRow;
use crate::config::NewUserSettings;
use crate::workflows::masking::{MaskField, PrivacyMask};
use crate::workflows::normalizer::{convert_date, pad_tab_number};
use crate::workflows::rejections::RecordRejection;

/// Citizenship that requires the national passport instead of the foreign one.
pub const HOME_COUNTRY: &str = "RU";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TravelEmployee {
    pub tab_num: String,
    pub birthday: String,
    pub citizenship_code: String,
    pub gender: String,
    pub names: Vec<PersonName>,
    pub documents: Vec<IdentityCard>,
    pub service: ServiceInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth: Option<AuthBlock>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonName {
    pub lang: &'static str,
    pub surname: Option<String>,
    pub name: Option<String>,
    /// Outer `None` drops the key; `Some(None)` is sent as `null`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub middle_name: Option<Option<String>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IdentityCardType {
    RussianPassport,
    ForeignPassport,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityCard {
    pub identity_card_type: IdentityCardType,
    pub card_number: String,
    pub issue_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expire_date: Option<String>,
    pub country: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub place_of_birth: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceInfo {
    pub unit_name: String,
    pub cost_name: String,
    pub position: String,
    pub authorizators: Vec<Authorizer>,
    pub travel_policy: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Authorizer {
    pub tab_num: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthBlock {
    pub login: String,
    pub policy: String,
    pub password: String,
    pub roles: Vec<String>,
    pub active_user: &'static str,
    /// Always sent empty.
    pub detail_policies: Vec<serde_json::Value>,
}

/// Builds one employee or explains which concept is missing.
pub struct EmployeeBuilder<'a> {
    new_user: &'a NewUserSettings,
    mask: &'a PrivacyMask,
}

impl<'a> EmployeeBuilder<'a> {
    pub fn new(new_user: &'a NewUserSettings, mask: &'a PrivacyMask) -> Self {
        Self { new_user, mask }
    }

    pub fn build(&self, row: &TravelRow) -> Result<TravelEmployee, RecordRejection> {
        let tab_number = pad_tab_number(row.tab_number.as_deref().unwrap_or_default());
        let reject = |reason: &str| RecordRejection::new(tab_number.clone(), reason);

        let birthday = row
            .birthday
            .as_deref()
            .ok_or_else(|| reject("birth date is not filled"))?;
        let country = row
            .country
            .as_deref()
            .ok_or_else(|| reject("country is not filled"))?;
        let gender = row
            .gender
            .as_deref()
            .ok_or_else(|| reject("gender is not filled"))?;

        if country == HOME_COUNTRY {
            if row.ru_card_number.is_none() || row.ru_issue_date.is_none() {
                return Err(reject("national passport is not filled"));
            }
        } else if row.en_card_number.is_none() || row.en_issue_date.is_none() {
            return Err(reject("foreign passport is not filled"));
        }

        let (Some(position), Some(unit_name), Some(cost_name)) = (
            row.position.as_deref(),
            row.unit_name.as_deref(),
            row.cost_name.as_deref(),
        ) else {
            return Err(reject("org structure is not filled"));
        };

        let (Some(role), Some(travel_policy)) = (row.role.as_deref(), row.travel_policy.as_deref())
        else {
            return Err(reject("roles are not filled"));
        };

        let birthday = convert_date(&self.mask.apply(MaskField::Birthday, birthday))
            .ok_or_else(|| reject("birth date is not a valid date"))?;
        let country = self.mask.apply(MaskField::Country, country);

        Ok(TravelEmployee {
            tab_num: self.mask.apply(MaskField::TabNumber, &tab_number),
            birthday,
            citizenship_code: country.clone(),
            gender: self.mask.apply(MaskField::Gender, gender),
            names: self.names(row),
            documents: self.documents(row, &country),
            service: ServiceInfo {
                unit_name: unit_name.to_string(),
                cost_name: cost_name.to_string(),
                position: position.to_string(),
                authorizators: row
                    .authorizer
                    .as_deref()
                    .map(|tab| Authorizer {
                        tab_num: self.mask.apply(MaskField::TabNumber, tab),
                    })
                    .into_iter()
                    .collect(),
                travel_policy: travel_policy.to_string(),
            },
            auth: self.auth(row, role),
        })
    }

    fn names(&self, row: &TravelRow) -> Vec<PersonName> {
        let mask = self.mask;
        vec![
            PersonName {
                lang: "RU",
                surname: mask.apply_opt(MaskField::RuSurname, row.ru_surname.as_deref()),
                name: mask.apply_opt(MaskField::RuName, row.ru_name.as_deref()),
                middle_name: Some(
                    mask.apply_opt(MaskField::RuMiddleName, row.ru_middle_name.as_deref()),
                ),
            },
            PersonName {
                lang: "EN",
                surname: mask.apply_opt(MaskField::EnSurname, row.en_surname.as_deref()),
                name: mask.apply_opt(MaskField::EnName, row.en_name.as_deref()),
                middle_name: None,
            },
        ]
    }

    /// A foreign citizen may still hold a national passport, and vice versa.
    fn documents(&self, row: &TravelRow, country: &str) -> Vec<IdentityCard> {
        let mask = self.mask;
        let mut documents = Vec::with_capacity(2);

        if let Some(number) = row.ru_card_number.as_deref() {
            documents.push(IdentityCard {
                identity_card_type: IdentityCardType::RussianPassport,
                card_number: mask.apply(MaskField::RuCardNumber, number),
                issue_date: mask.apply_opt(MaskField::RuIssueDate, row.ru_issue_date.as_deref()),
                expire_date: None,
                country: country.to_string(),
                place_of_birth: mask
                    .apply_opt(MaskField::RuPlaceOfBirth, row.ru_place_of_birth.as_deref()),
            });
        }

        if let Some(number) = row.en_card_number.as_deref() {
            documents.push(IdentityCard {
                identity_card_type: IdentityCardType::ForeignPassport,
                card_number: mask.apply(MaskField::EnCardNumber, number),
                issue_date: mask.apply_opt(MaskField::EnIssueDate, row.en_issue_date.as_deref()),
                expire_date: mask
                    .apply_opt(MaskField::EnExpireDate, row.en_expire_date.as_deref()),
                country: country.to_string(),
                place_of_birth: None,
            });
        }

        documents
    }

    fn auth(&self, row: &TravelRow, role: &str) -> Option<AuthBlock> {
        let login = row.login.as_deref()?;
        let policy = if role == self.new_user.holding_user_role {
            &self.new_user.holding_user_policy
        } else {
            &self.new_user.other_user_policy
        };

        Some(AuthBlock {
            login: self.mask.apply(MaskField::Login, login),
            policy: policy.clone(),
            password: self.new_user.password.clone(),
            roles: vec![role.to_string()],
            active_user: "TRUE",
            detail_policies: Vec::new(),
        })
    }
}
