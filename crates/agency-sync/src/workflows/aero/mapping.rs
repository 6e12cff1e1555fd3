use crate::workflows::source::RawRecord;

/// Column positions of the AeroClub extract.
mod column {
    pub(super) const RU_SURNAME: usize = 1;
    pub(super) const RU_NAME: usize = 2;
    pub(super) const RU_MIDDLE_NAME: usize = 3;
    pub(super) const EN_SURNAME: usize = 4;
    pub(super) const EN_NAME: usize = 5;
    pub(super) const CITIZENSHIP: usize = 6;
    pub(super) const GENDER: usize = 7;
    pub(super) const BIRTHDAY: usize = 8;
    pub(super) const RU_SERIES: usize = 9;
    pub(super) const RU_NUMBER: usize = 10;
    pub(super) const RU_ISSUE_DATE: usize = 11;
    pub(super) const EN_SERIES: usize = 14;
    pub(super) const EN_NUMBER: usize = 15;
    pub(super) const EN_ISSUE_DATE: usize = 16;
    pub(super) const EN_EXPIRE_DATE: usize = 17;
    pub(super) const EMAIL: usize = 20;
    pub(super) const TAB_NUMBER: usize = 21;
    pub(super) const GRADE: usize = 22;
    pub(super) const POSITION: usize = 23;
    pub(super) const DEPARTMENT: usize = 24;
    pub(super) const DIVISION: usize = 25;
    pub(super) const COST_CENTER: usize = 26;
    pub(super) const MANAGER_EMAIL: usize = 28;
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AeroRow {
    pub ru_surname: Option<String>,
    pub ru_name: Option<String>,
    pub ru_middle_name: Option<String>,
    pub en_surname: Option<String>,
    pub en_name: Option<String>,
    pub citizenship: Option<String>,
    /// `m` for male, anything else is female.
    pub gender: Option<String>,
    pub birthday: Option<String>,
    pub ru_series: Option<String>,
    pub ru_number: Option<String>,
    pub ru_issue_date: Option<String>,
    pub en_series: Option<String>,
    pub en_number: Option<String>,
    pub en_issue_date: Option<String>,
    pub en_expire_date: Option<String>,
    pub email: Option<String>,
    pub tab_number: Option<String>,
    pub grade: Option<String>,
    pub position: Option<String>,
    pub department: Option<String>,
    pub division: Option<String>,
    pub cost_center: Option<String>,
    pub manager_email: Option<String>,
}

impl AeroRow {
    pub fn from_record(record: &RawRecord) -> Self {
        let field = |index: usize| record.get(index).map(|value| value.trim().to_string());
        Self {
            ru_surname: field(column::RU_SURNAME),
            ru_name: field(column::RU_NAME),
            ru_middle_name: field(column::RU_MIDDLE_NAME),
            en_surname: field(column::EN_SURNAME),
            en_name: field(column::EN_NAME),
            citizenship: field(column::CITIZENSHIP),
            gender: field(column::GENDER),
            birthday: field(column::BIRTHDAY),
            ru_series: field(column::RU_SERIES),
            ru_number: field(column::RU_NUMBER),
            ru_issue_date: field(column::RU_ISSUE_DATE),
            en_series: field(column::EN_SERIES),
            en_number: field(column::EN_NUMBER),
            en_issue_date: field(column::EN_ISSUE_DATE),
            en_expire_date: field(column::EN_EXPIRE_DATE),
            email: field(column::EMAIL),
            tab_number: field(column::TAB_NUMBER),
            grade: field(column::GRADE),
            position: field(column::POSITION),
            department: field(column::DEPARTMENT),
            division: field(column::DIVISION),
            cost_center: field(column::COST_CENTER),
            manager_email: field(column::MANAGER_EMAIL),
        }
    }
}
