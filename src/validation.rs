//! Local validation run before a step is sent for matching.
//!
//! Rules are data: a field, a check, and a [`Condition`] interpreted against
//! the current form. A step with any [`FieldIssue`] never reaches the
//! matching endpoint.

use chrono::NaiveDate;
use phonenumber::country;
use validator::ValidateEmail;

use crate::domain::fields::{AddressField, BusinessField, ContactField, FieldKey, WizardStep};
use crate::domain::types::{SectionId, non_blank, normalize_postal_code};
use crate::wizard::form::ClientForm;

/// Minimum age of an individual client.
pub const MINIMUM_AGE: u32 = 19;

/// A field inside a repeatable section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionField {
    Address(AddressField),
    Contact(ContactField),
}

impl SectionField {
    fn key(self, id: SectionId) -> FieldKey<SectionId> {
        match self {
            SectionField::Address(field) => FieldKey::Address(id, field),
            SectionField::Contact(field) => FieldKey::Contact(id, field),
        }
    }

    fn section_at(self, form: &ClientForm, index: usize) -> Option<SectionId> {
        match self {
            SectionField::Address(_) => form.addresses().id_at(index),
            SectionField::Contact(_) => form.contacts().id_at(index),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleField {
    Business(BusinessField),
    Section(SectionField),
}

/// Which section a section-field condition reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionRef {
    /// The section the rule is being evaluated for.
    Current,
    /// A section by display index.
    At(usize),
}

/// When a rule applies. Blank values compare equal to `""`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    Always,
    FieldEquals(BusinessField, &'static str),
    FieldArrayIndexEquals {
        field: SectionField,
        index: SectionRef,
        value: &'static str,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Check {
    Required,
    Email,
    Phone,
    /// Canadian or US format, depending on the country of the same section.
    PostalCode,
    MaxLength(usize),
    /// Year, month and day form a real date, not in the future, at least
    /// [`MINIMUM_AGE`] years ago.
    Birthdate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rule {
    pub field: RuleField,
    pub check: Check,
    pub when: Condition,
    pub message: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIssue {
    /// `None` when the issue concerns the step as a whole.
    pub field: Option<FieldKey<SectionId>>,
    pub message: String,
}

const INDIVIDUAL: &str = "I";
const NAMED_TYPES: [&str; 5] = ["C", "S", "P", "RSP", "U"];
const REGISTERED_TYPES: [&str; 3] = ["C", "S", "P"];

fn business(field: BusinessField, check: Check, when: Condition, message: &'static str) -> Rule {
    Rule {
        field: RuleField::Business(field),
        check,
        when,
        message,
    }
}

fn address(field: AddressField, check: Check, when: Condition, message: &'static str) -> Rule {
    Rule {
        field: RuleField::Section(SectionField::Address(field)),
        check,
        when,
        message,
    }
}

fn contact(field: ContactField, check: Check, when: Condition, message: &'static str) -> Rule {
    Rule {
        field: RuleField::Section(SectionField::Contact(field)),
        check,
        when,
        message,
    }
}

fn business_rules() -> Vec<Rule> {
    use BusinessField as F;
    use Condition::{Always, FieldEquals};

    let individual = FieldEquals(F::ClientType, INDIVIDUAL);
    let mut rules = vec![
        business(F::ClientType, Check::Required, Always, "You must select a client type"),
        business(F::FirstName, Check::Required, individual, "You must enter a first name"),
        business(F::LastName, Check::Required, individual, "You must enter a last name"),
        business(F::BirthdateYear, Check::Required, individual, "You must enter a year"),
        business(F::BirthdateMonth, Check::Required, individual, "You must enter a month"),
        business(F::BirthdateDay, Check::Required, individual, "You must enter a day"),
        business(
            F::BirthdateYear,
            Check::Birthdate,
            individual,
            "You must be at least 19 years old and born on a valid date",
        ),
        business(
            F::IdentificationType,
            Check::Required,
            individual,
            "You must select an ID type",
        ),
        business(
            F::ClientIdentification,
            Check::Required,
            individual,
            "You must enter an ID number",
        ),
    ];
    for code in NAMED_TYPES {
        rules.push(business(
            F::BusinessName,
            Check::Required,
            FieldEquals(F::ClientType, code),
            "You must enter a business name",
        ));
    }
    for code in REGISTERED_TYPES {
        rules.push(business(
            F::RegistrationNumber,
            Check::Required,
            FieldEquals(F::ClientType, code),
            "You must enter a registration number",
        ));
    }
    for (field, max) in [
        (F::FirstName, 30),
        (F::LastName, 60),
        (F::IdentificationType, 4),
        (F::IdentificationProvince, 50),
        (F::ClientIdentification, 40),
        (F::RegistrationNumber, 13),
        (F::BusinessName, 60),
        (F::ClientAcronym, 8),
        (F::DoingBusinessAs, 120),
    ] {
        rules.push(business(field, Check::MaxLength(max), Always, "This value is too long"));
    }
    rules
}

fn location_rules() -> Vec<Rule> {
    use AddressField as F;
    use Condition::Always;

    let country_is = |value| Condition::FieldArrayIndexEquals {
        field: SectionField::Address(F::Country),
        index: SectionRef::Current,
        value,
    };
    let mut rules = vec![
        address(F::LocationName, Check::Required, Always, "You must enter a location name"),
        address(F::StreetAddress, Check::Required, Always, "You must enter a street address"),
        address(F::City, Check::Required, Always, "You must enter a city"),
        address(F::Country, Check::Required, Always, "You must select a country"),
        address(F::Province, Check::Required, country_is("CA"), "You must select a province"),
        address(F::Province, Check::Required, country_is("US"), "You must select a state"),
        address(F::PostalCode, Check::Required, Always, "You must enter a postal code"),
        address(F::PostalCode, Check::PostalCode, Always, "The postal code is not valid"),
        address(F::EmailAddress, Check::Email, Always, "You must enter a valid email address"),
    ];
    for field in [F::BusinessPhoneNumber, F::SecondaryPhoneNumber, F::FaxNumber] {
        rules.push(address(field, Check::Phone, Always, "You must enter a valid phone number"));
    }
    for (field, max) in [
        (F::LocationName, 40),
        (F::StreetAddress, 40),
        (F::City, 30),
        (F::Province, 50),
        (F::Country, 50),
        (F::PostalCode, 10),
        (F::EmailAddress, 100),
        (F::BusinessPhoneNumber, 20),
        (F::SecondaryPhoneNumber, 20),
        (F::FaxNumber, 20),
        (F::Notes, 4000),
    ] {
        rules.push(address(field, Check::MaxLength(max), Always, "This value is too long"));
    }
    rules
}

fn contact_rules() -> Vec<Rule> {
    use Condition::Always;
    use ContactField as F;

    // Someone has to be reachable by phone when the primary location is not.
    let primary_without_phone = Condition::FieldArrayIndexEquals {
        field: SectionField::Address(AddressField::BusinessPhoneNumber),
        index: SectionRef::At(0),
        value: "",
    };
    let mut rules = vec![
        contact(F::ContactType, Check::Required, Always, "You must select a role"),
        contact(F::FirstName, Check::Required, Always, "You must enter a first name"),
        contact(F::LastName, Check::Required, Always, "You must enter a last name"),
        contact(F::Email, Check::Required, Always, "You must enter an email address"),
        contact(F::Email, Check::Email, Always, "You must enter a valid email address"),
        contact(
            F::PhoneNumber,
            Check::Required,
            primary_without_phone,
            "You must enter a phone number",
        ),
    ];
    for field in [F::PhoneNumber, F::SecondaryPhoneNumber, F::FaxNumber] {
        rules.push(contact(field, Check::Phone, Always, "You must enter a valid phone number"));
    }
    for (field, max) in [
        (F::FirstName, 30),
        (F::LastName, 30),
        (F::Email, 100),
        (F::PhoneNumber, 20),
        (F::SecondaryPhoneNumber, 20),
        (F::FaxNumber, 20),
    ] {
        rules.push(contact(field, Check::MaxLength(max), Always, "This value is too long"));
    }
    rules
}

/// Rule table of a step, in evaluation order.
pub fn rules_for(step: WizardStep) -> Vec<Rule> {
    match step {
        WizardStep::BusinessInformation => business_rules(),
        WizardStep::Locations => location_rules(),
        WizardStep::Contacts => contact_rules(),
        WizardStep::Review => Vec::new(),
    }
}

fn trimmed<'a>(form: &'a ClientForm, key: &FieldKey<SectionId>) -> Option<&'a str> {
    non_blank(form.value(key))
}

fn same(actual: Option<&str>, expected: &str) -> bool {
    actual.unwrap_or_default().eq_ignore_ascii_case(expected)
}

impl Condition {
    /// Evaluates the condition, `current` being the section a section rule
    /// runs for.
    pub fn holds(&self, form: &ClientForm, current: Option<SectionId>) -> bool {
        match *self {
            Condition::Always => true,
            Condition::FieldEquals(field, value) => {
                same(trimmed(form, &FieldKey::Business(field)), value)
            }
            Condition::FieldArrayIndexEquals {
                field,
                index,
                value,
            } => {
                let section = match index {
                    SectionRef::Current => current,
                    SectionRef::At(index) => field.section_at(form, index),
                };
                match section {
                    Some(id) => same(trimmed(form, &field.key(id)), value),
                    None => false,
                }
            }
        }
    }
}

fn is_valid_phone(value: &str) -> bool {
    phonenumber::parse(Some(country::Id::CA), value)
        .map(|number| phonenumber::is_valid(&number))
        .unwrap_or(false)
}

fn is_valid_postal_code(value: &str, country: Option<&str>) -> bool {
    let code = normalize_postal_code(value);
    let chars: Vec<char> = code.chars().collect();
    match country.map(str::to_ascii_uppercase).as_deref() {
        Some("CA") => {
            chars.len() == 6
                && chars.iter().enumerate().all(|(i, c)| {
                    if i % 2 == 0 {
                        c.is_ascii_alphabetic()
                    } else {
                        c.is_ascii_digit()
                    }
                })
        }
        Some("US") => {
            let digits: String = code.chars().filter(|c| *c != '-').collect();
            (digits.len() == 5 || digits.len() == 9) && digits.chars().all(|c| c.is_ascii_digit())
        }
        // Length of other codes is left to the max length rule.
        _ => true,
    }
}

fn is_valid_birthdate(form: &ClientForm, today: NaiveDate) -> bool {
    let parts = [
        BusinessField::BirthdateYear,
        BusinessField::BirthdateMonth,
        BusinessField::BirthdateDay,
    ];
    if parts
        .iter()
        .any(|part| trimmed(form, &FieldKey::Business(*part)).is_none())
    {
        // Missing parts are reported by the required rules.
        return true;
    }
    form.birthdate().is_some_and(|birthdate| {
        birthdate <= today
            && today
                .years_since(birthdate)
                .is_some_and(|age| age >= MINIMUM_AGE)
    })
}

impl Check {
    pub fn passes(
        &self,
        form: &ClientForm,
        key: &FieldKey<SectionId>,
        today: NaiveDate,
    ) -> bool {
        let value = trimmed(form, key);
        match *self {
            Check::Required => value.is_some(),
            Check::Email => value.is_none_or(|v| v.validate_email()),
            Check::Phone => value.is_none_or(is_valid_phone),
            Check::PostalCode => value.is_none_or(|v| {
                let country = match key {
                    FieldKey::Address(id, _) => {
                        trimmed(form, &FieldKey::Address(*id, AddressField::Country))
                    }
                    _ => None,
                };
                is_valid_postal_code(v, country)
            }),
            Check::MaxLength(max) => value.is_none_or(|v| v.chars().count() <= max),
            Check::Birthdate => is_valid_birthdate(form, today),
        }
    }
}

fn evaluate(
    rule: &Rule,
    form: &ClientForm,
    key: FieldKey<SectionId>,
    current: Option<SectionId>,
    today: NaiveDate,
    issues: &mut Vec<FieldIssue>,
) {
    if issues.iter().any(|issue| issue.field == Some(key)) {
        return;
    }
    if rule.when.holds(form, current) && !rule.check.passes(form, &key, today) {
        issues.push(FieldIssue {
            field: Some(key),
            message: rule.message.to_string(),
        });
    }
}

/// Message reported when the locations step has no address at all.
pub const LOCATION_REQUIRED: &str = "You must add at least one location";

/// Runs every rule of `step`, section rules once per section. A field reports
/// at most its first failing rule.
pub fn validate_step(form: &ClientForm, step: WizardStep, today: NaiveDate) -> Vec<FieldIssue> {
    let mut issues = Vec::new();
    if step == WizardStep::Locations && form.addresses().is_empty() {
        issues.push(FieldIssue {
            field: None,
            message: LOCATION_REQUIRED.to_string(),
        });
    }
    for rule in rules_for(step) {
        match rule.field {
            RuleField::Business(field) => {
                evaluate(&rule, form, FieldKey::Business(field), None, today, &mut issues);
            }
            RuleField::Section(field) => {
                let ids = match field {
                    SectionField::Address(_) => form.addresses().ids(),
                    SectionField::Contact(_) => form.contacts().ids(),
                };
                for id in ids {
                    evaluate(&rule, form, field.key(id), Some(id), today, &mut issues);
                }
            }
        }
    }
    issues
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 15).unwrap()
    }

    fn individual(year: &str, month: &str, day: &str) -> ClientForm {
        let mut form = ClientForm::new();
        for (field, value) in [
            (BusinessField::ClientType, "I"),
            (BusinessField::FirstName, "James"),
            (BusinessField::LastName, "Baxter"),
            (BusinessField::BirthdateYear, year),
            (BusinessField::BirthdateMonth, month),
            (BusinessField::BirthdateDay, day),
            (BusinessField::IdentificationType, "BCDL"),
            (BusinessField::ClientIdentification, "1234567"),
        ] {
            form.set(FieldKey::Business(field), value);
        }
        form
    }

    fn fields(issues: &[FieldIssue]) -> Vec<FieldKey<SectionId>> {
        issues.iter().filter_map(|issue| issue.field).collect()
    }

    #[test]
    fn complete_individual_passes() {
        let form = individual("1959", "5", "18");
        assert!(validate_step(&form, WizardStep::BusinessInformation, today()).is_empty());
    }

    #[test]
    fn birthdate_must_be_real_and_old_enough() {
        let too_young = individual("2010", "1", "1");
        assert_eq!(
            fields(&validate_step(&too_young, WizardStep::BusinessInformation, today())),
            vec![FieldKey::Business(BusinessField::BirthdateYear)]
        );

        let turns_nineteen_today = individual("2007", "1", "15");
        assert!(
            validate_step(&turns_nineteen_today, WizardStep::BusinessInformation, today())
                .is_empty()
        );

        let impossible = individual("1990", "2", "31");
        assert_eq!(
            validate_step(&impossible, WizardStep::BusinessInformation, today()).len(),
            1
        );
    }

    #[test]
    fn conditions_follow_client_type() {
        let mut form = ClientForm::new();
        form.set(FieldKey::Business(BusinessField::ClientType), "C");

        assert_eq!(
            fields(&validate_step(&form, WizardStep::BusinessInformation, today())),
            vec![
                FieldKey::Business(BusinessField::BusinessName),
                FieldKey::Business(BusinessField::RegistrationNumber),
            ]
        );

        form.set(FieldKey::Business(BusinessField::ClientType), "U");
        assert_eq!(
            fields(&validate_step(&form, WizardStep::BusinessInformation, today())),
            vec![FieldKey::Business(BusinessField::BusinessName)]
        );
    }

    #[test]
    fn section_rules_run_per_section_with_their_own_country() {
        let mut form = ClientForm::new();
        for country in ["CA", "FR"] {
            let id = form.add_address();
            for (field, value) in [
                (AddressField::LocationName, "Office"),
                (AddressField::StreetAddress, "1 Main St"),
                (AddressField::City, "Somewhere"),
                (AddressField::Country, country),
                (AddressField::PostalCode, "12345"),
            ] {
                form.set(FieldKey::Address(id, field), value);
            }
        }
        let ids = form.addresses().ids();

        let issues = validate_step(&form, WizardStep::Locations, today());
        assert_eq!(
            fields(&issues),
            vec![
                FieldKey::Address(ids[0], AddressField::Province),
                FieldKey::Address(ids[0], AddressField::PostalCode),
            ]
        );
    }

    #[test]
    fn indexed_condition_reads_the_referenced_section() {
        let mut form = ClientForm::new();
        let primary = form.add_address();
        let contact = form.add_contact();
        for (field, value) in [
            (ContactField::ContactType, "Billing"),
            (ContactField::FirstName, "Ann"),
            (ContactField::LastName, "Lee"),
            (ContactField::Email, "ann@example.com"),
        ] {
            form.set(FieldKey::Contact(contact, field), value);
        }

        assert_eq!(
            fields(&validate_step(&form, WizardStep::Contacts, today())),
            vec![FieldKey::Contact(contact, ContactField::PhoneNumber)]
        );

        form.set(
            FieldKey::Address(primary, AddressField::BusinessPhoneNumber),
            "250 387 6121",
        );
        assert!(validate_step(&form, WizardStep::Contacts, today()).is_empty());
    }

    fn complete_form() -> ClientForm {
        let mut form = individual("1959", "5", "18");
        let address = form.add_address();
        for (field, value) in [
            (AddressField::LocationName, "Head office"),
            (AddressField::StreetAddress, "12 Rue de Rivoli"),
            (AddressField::City, "Paris"),
            (AddressField::Country, "FR"),
            (AddressField::PostalCode, "75001"),
            (AddressField::BusinessPhoneNumber, "250 387 6121"),
        ] {
            form.set(FieldKey::Address(address, field), value);
        }
        let contact = form.add_contact();
        for (field, value) in [
            (ContactField::ContactType, "Billing"),
            (ContactField::FirstName, "Ann"),
            (ContactField::LastName, "Lee"),
            (ContactField::Email, "ann@example.com"),
        ] {
            form.set(FieldKey::Contact(contact, field), value);
        }
        form
    }

    fn step_keys(form: &ClientForm, step: WizardStep) -> Vec<FieldKey<SectionId>> {
        match step {
            WizardStep::BusinessInformation => BusinessField::ALL
                .iter()
                .map(|field| FieldKey::Business(*field))
                .collect(),
            WizardStep::Locations => form
                .addresses()
                .ids()
                .into_iter()
                .flat_map(|id| AddressField::ALL.iter().map(move |f| FieldKey::Address(id, *f)))
                .collect(),
            WizardStep::Contacts => form
                .contacts()
                .ids()
                .into_iter()
                .flat_map(|id| ContactField::ALL.iter().map(move |f| FieldKey::Contact(id, *f)))
                .collect(),
            WizardStep::Review => Vec::new(),
        }
    }

    #[test]
    fn locally_valid_steps_satisfy_the_endpoint_payload_rules() {
        use validator::Validate;

        let base = complete_form();
        let long = "x".repeat(130);
        let samples = [
            long.as_str(),
            "+1 250 555 0100 ext. 12345",
            "1234 5678 90",
            "PASSPORT",
            "ann@example",
            "  padded value  ",
        ];

        for step in [
            WizardStep::BusinessInformation,
            WizardStep::Locations,
            WizardStep::Contacts,
        ] {
            assert!(validate_step(&base, step, today()).is_empty(), "{step:?}");
            for key in step_keys(&base, step) {
                for sample in samples {
                    let mut form = base.clone();
                    form.set(key, sample);
                    if validate_step(&form, step, today()).is_empty() {
                        let (candidate, _) = form.candidate_for(step);
                        assert!(
                            candidate.validate().is_ok(),
                            "{key:?} = {sample:?} passes locally but the payload is rejected"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn payload_length_limits_are_reported_per_field() {
        let mut form = complete_form();
        let address = form.addresses().ids()[0];
        let postal = FieldKey::Address(address, AddressField::PostalCode);
        let phone = FieldKey::Address(address, AddressField::BusinessPhoneNumber);
        form.set(postal, "1234 5678 90");
        form.set(phone, "+1 250 555 0100 ext. 12345");

        let issues = fields(&validate_step(&form, WizardStep::Locations, today()));
        assert!(issues.contains(&postal));
        assert!(issues.contains(&phone));

        form.set(
            FieldKey::Business(BusinessField::IdentificationType),
            "PASSPORT",
        );
        assert_eq!(
            fields(&validate_step(&form, WizardStep::BusinessInformation, today())),
            vec![FieldKey::Business(BusinessField::IdentificationType)]
        );
    }

    #[test]
    fn locations_step_needs_an_address() {
        let form = individual("1959", "5", "18");
        let issues = validate_step(&form, WizardStep::Locations, today());
        assert_eq!(
            issues,
            vec![FieldIssue {
                field: None,
                message: LOCATION_REQUIRED.to_string(),
            }]
        );
        assert!(validate_step(&form, WizardStep::Contacts, today()).is_empty());
    }

    #[test]
    fn optional_formats_are_checked_only_when_present() {
        let mut form = ClientForm::new();
        let id = form.add_contact();
        let key = FieldKey::Contact(id, ContactField::Email);
        assert!(Check::Email.passes(&form, &key, today()));
        form.set(key, "not-an-email");
        assert!(!Check::Email.passes(&form, &key, today()));
        form.set(key, "ann@example.com");
        assert!(Check::Email.passes(&form, &key, today()));
    }
}
