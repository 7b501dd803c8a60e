/// Device family the screen is presented on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Platform {
    /// Phone or tablet
    #[default]
    Handheld,
    Television,
}

impl Platform {
    pub fn is_television(&self) -> bool {
        matches!(self, Platform::Television)
    }

    /// How the screen leaves when playback finishes
    pub fn dismissal(&self) -> Dismissal {
        match self {
            Platform::Handheld => Dismissal::DismissModal,
            Platform::Television => Dismissal::PopNavigation,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dismissal {
    DismissModal,
    PopNavigation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SizeClass {
    #[default]
    Compact,
    Regular,
}

/// Horizontal and vertical size classes of the hosting window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TraitCollection {
    pub horizontal: SizeClass,
    pub vertical: SizeClass,
}

impl TraitCollection {
    pub fn new(horizontal: SizeClass, vertical: SizeClass) -> Self {
        Self {
            horizontal,
            vertical,
        }
    }

    pub fn regular() -> Self {
        Self::new(SizeClass::Regular, SizeClass::Regular)
    }

    /// Full-size windows get a centered alert, everything else an action sheet
    pub fn prompt_style(&self) -> PromptStyle {
        if self.horizontal == SizeClass::Regular && self.vertical == SizeClass::Regular {
            PromptStyle::Alert
        } else {
            PromptStyle::ActionSheet
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptStyle {
    Alert,
    ActionSheet,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_style_follows_size_classes() {
        assert_eq!(TraitCollection::regular().prompt_style(), PromptStyle::Alert);
        assert_eq!(
            TraitCollection::new(SizeClass::Regular, SizeClass::Compact).prompt_style(),
            PromptStyle::ActionSheet
        );
        assert_eq!(
            TraitCollection::default().prompt_style(),
            PromptStyle::ActionSheet
        );
    }

    #[test]
    fn test_dismissal_per_platform() {
        assert_eq!(Platform::Handheld.dismissal(), Dismissal::DismissModal);
        assert_eq!(Platform::Television.dismissal(), Dismissal::PopNavigation);
    }
}
