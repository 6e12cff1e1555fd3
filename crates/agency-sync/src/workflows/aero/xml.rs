//! Namespaced `profiles` document written with quick-xml events.

use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::fmt;

use super::profile::{AeroProfile, LocalizedName, TravelDocument};

pub const PROFILES_NS: &str = "http://integration.aeroclub.ru/hub/schemas/profiles";
pub const XS_NS: &str = "http://www.w3.org/2001/XMLSchema";
pub const XSI_NS: &str = "http://www.w3.org/2001/XMLSchema-instance";

const SCOPED: [(&str, &str); 2] = [("xmlns:xs", XS_NS), ("xmlns", PROFILES_NS)];
const NIL: (&str, &str) = ("xsi:nil", "true");

#[derive(Debug)]
pub enum XmlError {
    Io(std::io::Error),
    Encode(quick_xml::Error),
}

impl fmt::Display for XmlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            XmlError::Io(err) => write!(f, "failed to write profiles document: {}", err),
            XmlError::Encode(err) => write!(f, "failed to encode profiles document: {}", err),
        }
    }
}

impl std::error::Error for XmlError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            XmlError::Io(err) => Some(err),
            XmlError::Encode(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for XmlError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<quick_xml::Error> for XmlError {
    fn from(err: quick_xml::Error) -> Self {
        Self::Encode(err)
    }
}

/// Serializes the profiles of one company. No XML declaration is written.
pub fn render_profiles(profiles: &[AeroProfile]) -> Result<Vec<u8>, XmlError> {
    let mut out = ProfilesWriter::new();
    out.start(
        "profiles",
        &[("xmlns:xsi", XSI_NS), ("xmlns:xs", XS_NS), ("xmlns", PROFILES_NS)],
    )?;
    for profile in profiles {
        out.profile(profile)?;
    }
    out.end("profiles")?;
    Ok(out.into_inner())
}

struct ProfilesWriter {
    writer: Writer<Vec<u8>>,
}

impl ProfilesWriter {
    fn new() -> Self {
        Self {
            writer: Writer::new(Vec::new()),
        }
    }

    fn into_inner(self) -> Vec<u8> {
        self.writer.into_inner()
    }

    fn start(&mut self, name: &str, attributes: &[(&str, &str)]) -> Result<(), XmlError> {
        let element = BytesStart::new(name).with_attributes(attributes.iter().copied());
        self.writer.write_event(Event::Start(element))?;
        Ok(())
    }

    fn end(&mut self, name: &str) -> Result<(), XmlError> {
        self.writer.write_event(Event::End(BytesEnd::new(name)))?;
        Ok(())
    }

    fn empty(&mut self, name: &str, attributes: &[(&str, &str)]) -> Result<(), XmlError> {
        let element = BytesStart::new(name).with_attributes(attributes.iter().copied());
        self.writer.write_event(Event::Empty(element))?;
        Ok(())
    }

    /// Absent values become empty elements.
    fn text(&mut self, name: &str, value: Option<&str>) -> Result<(), XmlError> {
        match value {
            Some(value) => {
                self.start(name, &[])?;
                self.writer.write_event(Event::Text(BytesText::new(value)))?;
                self.end(name)
            }
            None => self.empty(name, &[]),
        }
    }

    fn localized(&mut self, name: &str, value: &LocalizedName) -> Result<(), XmlError> {
        self.start(name, &[])?;
        self.text("russian", value.russian.as_deref())?;
        self.text("english", value.english.as_deref())?;
        self.end(name)
    }

    fn profile(&mut self, profile: &AeroProfile) -> Result<(), XmlError> {
        self.start(
            "profile",
            &[
                ("uniqueIdentifier", profile.unique_identifier.as_str()),
                (
                    "companyUniqueIdentifier",
                    profile.company_unique_identifier.as_str(),
                ),
            ],
        )?;
        self.localized("firstName", &profile.first_name)?;
        self.localized("middleName", &profile.middle_name)?;
        self.localized("lastName", &profile.last_name)?;
        self.text("gender", Some(profile.gender.as_str()))?;
        self.text("dateOfBirth", Some(profile.date_of_birth.as_str()))?;
        self.empty("dateOfTermination", &[NIL])?;

        self.start("analytics", &SCOPED)?;
        self.start("properties", &SCOPED)?;
        for (identifier, value) in &profile.properties {
            self.start("property", &SCOPED)?;
            self.text("identifier", Some(*identifier))?;
            self.text("value", value.as_deref())?;
            self.end("property")?;
        }
        self.end("properties")?;
        self.end("analytics")?;

        self.start("contacts", &SCOPED)?;
        self.start("emailAddress", &[SCOPED[0], SCOPED[1], ("kind", "Work")])?;
        self.text("address", profile.work_email.as_deref())?;
        self.end("emailAddress")?;
        self.end("contacts")?;

        if let Some(document) = &profile.document {
            self.start("documents", &SCOPED)?;
            self.document(document)?;
            self.end("documents")?;
        }

        self.end("profile")
    }

    fn document(&mut self, document: &TravelDocument) -> Result<(), XmlError> {
        self.start(
            "document",
            &[
                ("xmlns:xsi", XSI_NS),
                SCOPED[0],
                SCOPED[1],
                ("type", document.kind.as_str()),
            ],
        )?;
        self.text("series", Some(document.series.as_str()))?;
        self.text("number", Some(document.number.as_str()))?;
        self.text("issuedOn", Some(document.issued_on.as_str()))?;
        match document.expires_on.as_deref() {
            Some(expires_on) => self.text("expiresOn", Some(expires_on))?,
            None => self.empty("expiresOn", &[NIL])?,
        }
        self.empty("placeOfBirth", &[])?;
        self.text("firstName", document.first_name.as_deref())?;
        self.text("lastName", document.last_name.as_deref())?;
        self.start("citizenship", &[])?;
        self.start("code", &[])?;
        self.text("iso3611-a2", Some(document.citizenship.as_str()))?;
        self.end("code")?;
        self.end("citizenship")?;
        self.end("document")
    }
}
