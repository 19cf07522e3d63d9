use crate::dashboard::binder::Bindable;
use std::collections::HashMap;

pub const KEY_BUILD_DATE_PREF: &str = "build_date";
pub const PROP_BUILD_DATE: &str = "ro.build.date";

/// Read-only system property lookup.
pub trait SystemProperties {
    fn get(&self, key: &str) -> Option<String>;
}

impl SystemProperties for HashMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        HashMap::get(self, key).cloned()
    }
}

/// Controller for a single preference on a settings screen.
pub trait PreferenceController {
    fn preference_key(&self) -> &str;
    fn is_available(&self) -> bool;
    /// Push the current value onto the preference.
    fn display(&self, pref: &mut dyn Bindable);
}

/// Shows the build date, falling back to a placeholder summary.
pub struct BuildDatePreferenceController<P: SystemProperties> {
    properties: P,
    placeholder: String,
}

impl<P: SystemProperties> BuildDatePreferenceController<P> {
    pub fn new(properties: P, placeholder: &str) -> Self {
        Self {
            properties,
            placeholder: placeholder.to_string(),
        }
    }

    fn build_date(&self) -> Option<String> {
        self.properties
            .get(PROP_BUILD_DATE)
            .filter(|v| !v.trim().is_empty())
    }
}

impl<P: SystemProperties> PreferenceController for BuildDatePreferenceController<P> {
    fn preference_key(&self) -> &str {
        KEY_BUILD_DATE_PREF
    }

    fn is_available(&self) -> bool {
        self.build_date().is_some()
    }

    fn display(&self, pref: &mut dyn Bindable) {
        let summary = self.build_date().unwrap_or_else(|| self.placeholder.clone());
        pref.set_summary(Some(&summary));
    }
}
