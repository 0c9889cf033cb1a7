//! # Wizard Engine
//!
//! Generic multi-section form stepper behind the create/edit dialogs.
//!
//! A form describes its sections (names, per-section validation, which
//! sections are currently enabled) through [`WizardForm`]; the [`Wizard`]
//! owns the form and drives navigation:
//!
//! - **advance** validates the current section before moving on
//! - **back** never validates
//! - **direct jumps** are gated in [`WizardMode::Create`] (only completed
//!   sections and the immediate next step are reachable) and free in
//!   [`WizardMode::Edit`]
//! - **submit** re-validates every enabled section in order and parks the
//!   wizard on the first offender
//!
//! Disabled sections are skipped by every navigation path and excluded from
//! progress counts, so a form can hide a step based on earlier answers.

use crate::error::{ValidationError, WizardError};

// =============================================================================
// Form Contract
// =============================================================================

/// A multi-section form the wizard can drive.
///
/// Implementations keep their own field state; the wizard only asks three
/// questions: what are the sections, is a given section enabled right now,
/// and does a section validate.
pub trait WizardForm {
    /// Section names, in step order. Must not change over the form's life.
    fn sections(&self) -> &'static [&'static str];

    /// Whether a section currently participates in the flow.
    ///
    /// The answer may depend on form state (a payment step that only exists
    /// for certain transaction types). Disabled sections are skipped and
    /// never validated.
    fn is_section_enabled(&self, _section: &str) -> bool {
        true
    }

    /// Validates one section's fields.
    fn validate_section(&self, section: &str) -> Result<(), ValidationError>;
}

/// How the wizard gates direct navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardMode {
    /// Fresh record: sections unlock in order as each one validates.
    Create,
    /// Existing record: every enabled section is freely reachable.
    Edit,
}

// =============================================================================
// Wizard
// =============================================================================

/// Stepper over a [`WizardForm`].
#[derive(Debug, Clone)]
pub struct Wizard<F: WizardForm> {
    form: F,
    mode: WizardMode,
    current: usize,
    completed: Vec<bool>,
}

impl<F: WizardForm> Wizard<F> {
    /// Starts a wizard on the form's first section.
    ///
    /// In [`WizardMode::Edit`] every section starts out completed, since the
    /// form was prefilled from an existing record; submit still re-validates.
    pub fn new(form: F, mode: WizardMode) -> Self {
        let count = form.sections().len();
        let completed = vec![mode == WizardMode::Edit; count];
        Wizard {
            form,
            mode,
            current: 0,
            completed,
        }
    }

    /// The wrapped form, for reading field state.
    pub fn form(&self) -> &F {
        &self.form
    }

    /// The wrapped form, for editing field state.
    pub fn form_mut(&mut self) -> &mut F {
        &mut self.form
    }

    /// Consumes the wizard, returning the form.
    pub fn into_form(self) -> F {
        self.form
    }

    /// The navigation mode this wizard was started in.
    pub fn mode(&self) -> WizardMode {
        self.mode
    }

    /// Name of the section the wizard is currently on.
    pub fn current_section(&self) -> &'static str {
        self.form.sections()[self.current]
    }

    /// Whether a section has been validated and stepped past.
    pub fn is_completed(&self, section: &str) -> bool {
        match self.index_of(section) {
            Some(i) => self.completed[i],
            None => false,
        }
    }

    /// `(completed, total)` over the currently enabled sections.
    pub fn progress(&self) -> (usize, usize) {
        let sections = self.form.sections();
        let mut done = 0;
        let mut total = 0;
        for (i, name) in sections.iter().enumerate() {
            if self.form.is_section_enabled(name) {
                total += 1;
                if self.completed[i] {
                    done += 1;
                }
            }
        }
        (done, total)
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    /// Validates the current section and steps to the next enabled one.
    ///
    /// ## Returns
    /// - `Ok(Some(name))` - moved onto section `name`
    /// - `Ok(None)` - the current section was the last enabled one; the
    ///   wizard stays on it and the form is ready to submit
    /// - `Err(WizardError::Invalid)` - the current section failed
    ///   validation and the wizard did not move
    pub fn advance(&mut self) -> Result<Option<&'static str>, WizardError> {
        let section = self.current_section();
        if self.form.is_section_enabled(section) {
            self.validate(section)?;
        }
        self.completed[self.current] = true;

        match self.next_enabled_after(self.current) {
            Some(i) => {
                self.current = i;
                Ok(Some(self.form.sections()[i]))
            }
            None => Ok(None),
        }
    }

    /// Steps back to the previous enabled section, without validating.
    ///
    /// Returns the section moved onto, or `None` when already on the first.
    pub fn back(&mut self) -> Option<&'static str> {
        let i = self.prev_enabled_before(self.current)?;
        self.current = i;
        Some(self.form.sections()[i])
    }

    /// Jumps directly to a named section.
    ///
    /// In [`WizardMode::Create`] only completed sections and the immediate
    /// next enabled step are reachable; everything else stays locked until
    /// the flow validates its way there ([`back`](Self::back) still walks
    /// to earlier sections freely). In [`WizardMode::Edit`] any enabled
    /// section is reachable. Disabled sections never are.
    pub fn go_to(&mut self, section: &str) -> Result<&'static str, WizardError> {
        let i = self
            .index_of(section)
            .ok_or_else(|| WizardError::UnknownSection(section.to_string()))?;
        let name = self.form.sections()[i];

        if !self.form.is_section_enabled(name) {
            return Err(WizardError::SectionLocked(name.to_string()));
        }

        if self.mode == WizardMode::Create {
            let reachable =
                self.completed[i] || self.next_enabled_after(self.current) == Some(i);
            if !reachable {
                return Err(WizardError::SectionLocked(name.to_string()));
            }
        }

        self.current = i;
        Ok(name)
    }

    /// Validates every enabled section, in order, for final submission.
    ///
    /// On the first failure the wizard jumps to the offending section and
    /// returns the validation error, so the dialog can focus it.
    pub fn submit(&mut self) -> Result<(), WizardError> {
        let sections = self.form.sections();
        for (i, name) in sections.iter().enumerate() {
            if !self.form.is_section_enabled(name) {
                continue;
            }
            if let Err(e) = self.form.validate_section(name) {
                self.current = i;
                return Err(WizardError::Invalid {
                    section: name.to_string(),
                    source: e,
                });
            }
            self.completed[i] = true;
        }
        Ok(())
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn validate(&self, section: &'static str) -> Result<(), WizardError> {
        self.form
            .validate_section(section)
            .map_err(|e| WizardError::Invalid {
                section: section.to_string(),
                source: e,
            })
    }

    fn index_of(&self, section: &str) -> Option<usize> {
        self.form.sections().iter().position(|s| *s == section)
    }

    fn next_enabled_after(&self, from: usize) -> Option<usize> {
        let sections = self.form.sections();
        ((from + 1)..sections.len()).find(|&i| self.form.is_section_enabled(sections[i]))
    }

    fn prev_enabled_before(&self, from: usize) -> Option<usize> {
        let sections = self.form.sections();
        (0..from).rev().find(|&i| self.form.is_section_enabled(sections[i]))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    /// Three-step form with a conditionally enabled middle section.
    #[derive(Default)]
    struct TestForm {
        name: String,
        wants_detail: bool,
        detail: String,
        confirmed: bool,
    }

    impl WizardForm for TestForm {
        fn sections(&self) -> &'static [&'static str] {
            &["basic", "detail", "confirm"]
        }

        fn is_section_enabled(&self, section: &str) -> bool {
            section != "detail" || self.wants_detail
        }

        fn validate_section(&self, section: &str) -> Result<(), ValidationError> {
            match section {
                "basic" => {
                    if self.name.trim().is_empty() {
                        return Err(ValidationError::Required {
                            field: "name".to_string(),
                        });
                    }
                    Ok(())
                }
                "detail" => {
                    if self.detail.trim().is_empty() {
                        return Err(ValidationError::Required {
                            field: "detail".to_string(),
                        });
                    }
                    Ok(())
                }
                "confirm" => {
                    if !self.confirmed {
                        return Err(ValidationError::Required {
                            field: "confirmed".to_string(),
                        });
                    }
                    Ok(())
                }
                other => Err(ValidationError::InvalidFormat {
                    field: other.to_string(),
                    reason: "unknown section".to_string(),
                }),
            }
        }
    }

    fn valid_form() -> TestForm {
        TestForm {
            name: "Pedro".to_string(),
            wants_detail: true,
            detail: "notes".to_string(),
            confirmed: true,
        }
    }

    #[test]
    fn test_advance_validates_before_moving() {
        let mut wizard = Wizard::new(TestForm::default(), WizardMode::Create);
        assert_eq!(wizard.current_section(), "basic");

        let err = wizard.advance().unwrap_err();
        assert!(matches!(err, WizardError::Invalid { ref section, .. } if section == "basic"));
        assert_eq!(wizard.current_section(), "basic");

        wizard.form_mut().name = "Pedro".to_string();
        assert_eq!(wizard.advance().unwrap(), Some("confirm")); // detail disabled
    }

    #[test]
    fn test_advance_walks_enabled_sections() {
        let mut wizard = Wizard::new(valid_form(), WizardMode::Create);

        assert_eq!(wizard.advance().unwrap(), Some("detail"));
        assert_eq!(wizard.advance().unwrap(), Some("confirm"));
        assert_eq!(wizard.advance().unwrap(), None); // last section, stays put
        assert_eq!(wizard.current_section(), "confirm");
        assert_eq!(wizard.progress(), (3, 3));
    }

    #[test]
    fn test_disabled_section_is_skipped_everywhere() {
        let mut form = valid_form();
        form.wants_detail = false;
        let mut wizard = Wizard::new(form, WizardMode::Create);

        assert_eq!(wizard.advance().unwrap(), Some("confirm"));
        assert_eq!(wizard.back(), Some("basic"));
        assert_eq!(wizard.progress().1, 2);

        let err = wizard.go_to("detail").unwrap_err();
        assert!(matches!(err, WizardError::SectionLocked(_)));
    }

    #[test]
    fn test_back_never_validates() {
        let mut wizard = Wizard::new(valid_form(), WizardMode::Create);
        wizard.advance().unwrap();

        wizard.form_mut().name = String::new(); // now invalid
        assert_eq!(wizard.back(), Some("basic"));
        assert_eq!(wizard.back(), None);
    }

    #[test]
    fn test_create_mode_gates_direct_jumps() {
        let mut wizard = Wizard::new(valid_form(), WizardMode::Create);

        // the immediate next step is reachable, later ones are not
        let err = wizard.go_to("confirm").unwrap_err();
        assert!(matches!(err, WizardError::SectionLocked(_)));
        assert_eq!(wizard.go_to("detail").unwrap(), "detail");

        // completed sections stay reachable
        wizard.back();
        wizard.advance().unwrap();
        assert_eq!(wizard.go_to("basic").unwrap(), "basic");

        let err = wizard.go_to("nowhere").unwrap_err();
        assert!(matches!(err, WizardError::UnknownSection(_)));
    }

    #[test]
    fn test_create_mode_locks_sections_left_unvalidated() {
        let mut wizard = Wizard::new(valid_form(), WizardMode::Create);

        // Jumping to the next step does not complete the one left behind,
        // so a direct jump back to it is refused until it validates.
        assert_eq!(wizard.go_to("detail").unwrap(), "detail");
        let err = wizard.go_to("basic").unwrap_err();
        assert!(matches!(err, WizardError::SectionLocked(_)));

        // back() still reaches it, and advancing through it unlocks it.
        assert_eq!(wizard.back(), Some("basic"));
        assert_eq!(wizard.advance().unwrap(), Some("detail"));
        assert_eq!(wizard.go_to("basic").unwrap(), "basic");
    }

    #[test]
    fn test_edit_mode_allows_free_jumps() {
        let mut wizard = Wizard::new(valid_form(), WizardMode::Edit);
        assert_eq!(wizard.go_to("confirm").unwrap(), "confirm");
        assert_eq!(wizard.go_to("basic").unwrap(), "basic");
    }

    #[test]
    fn test_submit_parks_on_first_invalid_section() {
        let mut form = valid_form();
        form.detail = String::new();
        let mut wizard = Wizard::new(form, WizardMode::Edit);
        wizard.go_to("confirm").unwrap();

        let err = wizard.submit().unwrap_err();
        assert!(matches!(err, WizardError::Invalid { ref section, .. } if section == "detail"));
        assert_eq!(wizard.current_section(), "detail");

        wizard.form_mut().detail = "notes".to_string();
        wizard.submit().unwrap();
        assert_eq!(wizard.progress(), (3, 3));
    }

    #[test]
    fn test_submit_skips_disabled_sections() {
        let mut form = valid_form();
        form.wants_detail = false;
        form.detail = String::new(); // would fail if checked
        let mut wizard = Wizard::new(form, WizardMode::Create);

        wizard.submit().unwrap();
    }
}
