use crate::workflows::source::RawRecord;

/// Column positions of the Travel-Click extract.
mod column {
    pub(super) const COMPANY_ID: usize = 0;
    pub(super) const TAB_NUMBER: usize = 1;
    pub(super) const EN_SURNAME: usize = 2;
    pub(super) const EN_NAME: usize = 3;
    pub(super) const RU_SURNAME: usize = 4;
    pub(super) const RU_NAME: usize = 5;
    pub(super) const RU_MIDDLE_NAME: usize = 6;
    pub(super) const BIRTHDAY: usize = 7;
    pub(super) const COUNTRY: usize = 8;
    pub(super) const GENDER: usize = 9;
    pub(super) const RU_CARD_NUMBER: usize = 10;
    pub(super) const RU_ISSUE_DATE: usize = 11;
    pub(super) const RU_PLACE_OF_BIRTH: usize = 12;
    pub(super) const EN_CARD_NUMBER: usize = 13;
    pub(super) const EN_ISSUE_DATE: usize = 14;
    pub(super) const EN_EXPIRE_DATE: usize = 15;
    pub(super) const LOGIN: usize = 16;
    pub(super) const POSITION: usize = 17;
    pub(super) const UNIT_NAME: usize = 18;
    pub(super) const COST_NAME: usize = 19;
    pub(super) const AUTHORIZER: usize = 20;
    pub(super) const ROLE: usize = 22;
    pub(super) const TRAVEL_POLICY: usize = 23;
}

/// One extract row with named fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TravelRow {
    pub company_id: Option<String>,
    pub tab_number: Option<String>,
    pub en_surname: Option<String>,
    pub en_name: Option<String>,
    pub ru_surname: Option<String>,
    pub ru_name: Option<String>,
    pub ru_middle_name: Option<String>,
    pub birthday: Option<String>,
    pub country: Option<String>,
    pub gender: Option<String>,
    pub ru_card_number: Option<String>,
    pub ru_issue_date: Option<String>,
    pub ru_place_of_birth: Option<String>,
    pub en_card_number: Option<String>,
    pub en_issue_date: Option<String>,
    pub en_expire_date: Option<String>,
    pub login: Option<String>,
    pub position: Option<String>,
    pub unit_name: Option<String>,
    pub cost_name: Option<String>,
    pub authorizer: Option<String>,
    pub role: Option<String>,
    pub travel_policy: Option<String>,
}

impl TravelRow {
    pub fn from_record(record: &RawRecord) -> Self {
        let field = |index: usize| record.get(index).map(|value| value.trim().to_string());
        Self {
            company_id: field(column::COMPANY_ID),
            tab_number: field(column::TAB_NUMBER),
            en_surname: field(column::EN_SURNAME),
            en_name: field(column::EN_NAME),
            ru_surname: field(column::RU_SURNAME),
            ru_name: field(column::RU_NAME),
            ru_middle_name: field(column::RU_MIDDLE_NAME),
            birthday: field(column::BIRTHDAY),
            country: field(column::COUNTRY),
            gender: field(column::GENDER),
            ru_card_number: field(column::RU_CARD_NUMBER),
            ru_issue_date: field(column::RU_ISSUE_DATE),
            ru_place_of_birth: field(column::RU_PLACE_OF_BIRTH),
            en_card_number: field(column::EN_CARD_NUMBER),
            en_issue_date: field(column::EN_ISSUE_DATE),
            en_expire_date: field(column::EN_EXPIRE_DATE),
            login: field(column::LOGIN),
            position: field(column::POSITION),
            unit_name: field(column::UNIT_NAME),
            cost_name: field(column::COST_NAME),
            authorizer: field(column::AUTHORIZER),
            role: field(column::ROLE),
            travel_policy: field(column::TRAVEL_POLICY),
        }
    }

    pub fn belongs_to(&self, company_id: &str) -> bool {
        self.company_id.as_deref() == Some(company_id.trim())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_positions_to_names() {
        let mut fields = vec![""; 24];
        fields[0] = "1000";
        fields[1] = "12";
        fields[8] = "RU";
        fields[22] = "TRAVELER";
        fields[23] = "STANDARD";
        let row = TravelRow::from_record(&RawRecord::from_strs(&fields));

        assert_eq!(row.company_id.as_deref(), Some("1000"));
        assert_eq!(row.tab_number.as_deref(), Some("12"));
        assert_eq!(row.country.as_deref(), Some("RU"));
        assert_eq!(row.role.as_deref(), Some("TRAVELER"));
        assert_eq!(row.travel_policy.as_deref(), Some("STANDARD"));
        assert!(row.birthday.is_none());
    }

    #[test]
    fn short_rows_leave_trailing_fields_missing() {
        let row = TravelRow::from_record(&RawRecord::from_strs(&["1000", "12"]));
        assert!(row.belongs_to(" 1000 "));
        assert!(row.travel_policy.is_none());
    }
}
