//! Navigation-related state types.
//!
//! This module contains enums and types related to navigation, views, the sidebar
//! menu, and focus.

/// Specifying the different foci.
///
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Focus {
    Menu,
    View,
}

/// Specifying the different views.
///
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum View {
    Dashboard,
    Forms,
    Designer,
    Templates,
    Publish,
    Analysis,
}

impl View {
    pub fn title(&self) -> &'static str {
        match self {
            View::Dashboard => "Dashboard",
            View::Forms => "Forms",
            View::Designer => "Designer",
            View::Templates => "Templates",
            View::Publish => "Publish",
            View::Analysis => "Analysis",
        }
    }
}

/// Views reachable from the sidebar, in display order.
///
pub const MENU_VIEWS: [View; 4] = [View::Dashboard, View::Forms, View::Templates, View::Analysis];

/// Specifies which designer pane receives navigation keys.
///
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum DesignerPane {
    Library,
    Canvas,
    Properties,
}

impl DesignerPane {
    pub fn next(self) -> Self {
        match self {
            DesignerPane::Library => DesignerPane::Canvas,
            DesignerPane::Canvas => DesignerPane::Properties,
            DesignerPane::Properties => DesignerPane::Library,
        }
    }

    pub fn previous(self) -> Self {
        match self {
            DesignerPane::Library => DesignerPane::Properties,
            DesignerPane::Canvas => DesignerPane::Library,
            DesignerPane::Properties => DesignerPane::Canvas,
        }
    }
}

/// Defines the two lists of the template screen.
///
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum TemplateTab {
    System,
    Custom,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_focus() {
        assert_eq!(Focus::Menu, Focus::Menu);
        assert_ne!(Focus::Menu, Focus::View);
    }

    #[test]
    fn test_menu_views() {
        assert_eq!(MENU_VIEWS[0], View::Dashboard);
        assert!(!MENU_VIEWS.contains(&View::Designer));
        assert_eq!(View::Analysis.title(), "Analysis");
    }

    #[test]
    fn test_designer_pane_cycle() {
        let mut pane = DesignerPane::Library;
        for _ in 0..3 {
            pane = pane.next();
        }
        assert_eq!(pane, DesignerPane::Library);
        assert_eq!(DesignerPane::Library.previous(), DesignerPane::Properties);
        assert_eq!(DesignerPane::Canvas.previous(), DesignerPane::Library);
    }
}
