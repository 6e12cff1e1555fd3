//! Decoy substitution for personal data while the debug flag is on.

/// Every personal field that can leave the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaskField {
    RuSurname,
    RuName,
    RuMiddleName,
    EnSurname,
    EnName,
    Login,
    RuCardNumber,
    RuIssueDate,
    Country,
    RuPlaceOfBirth,
    EnCardNumber,
    EnIssueDate,
    EnExpireDate,
    Birthday,
    Gender,
    Email,
    OtherEmail,
    TabNumber,
}

/// How an agency spells the decoy gender.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenderEncoding {
    /// `Male` / `Female`
    TitleCase,
    /// `MALE` / `FEMALE`
    UpperCase,
}

impl GenderEncoding {
    pub fn male(self) -> &'static str {
        match self {
            GenderEncoding::TitleCase => "Male",
            GenderEncoding::UpperCase => "MALE",
        }
    }

    pub fn female(self) -> &'static str {
        match self {
            GenderEncoding::TitleCase => "Female",
            GenderEncoding::UpperCase => "FEMALE",
        }
    }
}

/// Fixed stand-in person. Dates are in extract format so they convert like real values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecoyPerson {
    gender: GenderEncoding,
}

impl DecoyPerson {
    pub fn new(gender: GenderEncoding) -> Self {
        Self { gender }
    }

    pub fn value(&self, field: MaskField) -> &'static str {
        match field {
            MaskField::RuSurname => "Дубощит",
            MaskField::RuName => "Торин",
            MaskField::RuMiddleName => "Траинович",
            MaskField::EnSurname => "Oakenshield",
            MaskField::EnName => "Thorin",
            MaskField::Login => "Thorin",
            MaskField::RuCardNumber => "1234567890",
            MaskField::RuIssueDate => "31.12.2010",
            MaskField::Country => "RU",
            MaskField::RuPlaceOfBirth => "Эребор",
            MaskField::EnCardNumber => "9876543210",
            MaskField::EnIssueDate => "01.01.2010",
            MaskField::EnExpireDate => "31.12.2050",
            MaskField::Birthday => "01.01.2001",
            MaskField::Gender => self.gender.male(),
            MaskField::Email => "thorin@somemail.ru",
            MaskField::OtherEmail => "gendalf@somemail.ru",
            MaskField::TabNumber => "00001234",
        }
    }
}

/// Per-field masking; disabled masks pass values through untouched.
#[derive(Debug, Clone)]
pub struct PrivacyMask {
    enabled: bool,
    decoy: DecoyPerson,
}

impl PrivacyMask {
    pub fn new(enabled: bool, gender: GenderEncoding) -> Self {
        Self {
            enabled,
            decoy: DecoyPerson::new(gender),
        }
    }

    pub fn apply(&self, field: MaskField, real: &str) -> String {
        if self.enabled {
            self.decoy.value(field).to_string()
        } else {
            real.to_string()
        }
    }

    /// Absent values stay absent unless masking substitutes a decoy.
    pub fn apply_opt(&self, field: MaskField, real: Option<&str>) -> Option<String> {
        if self.enabled {
            Some(self.decoy.value(field).to_string())
        } else {
            real.map(str::to_string)
        }
    }
}
