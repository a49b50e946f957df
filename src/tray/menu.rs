//! Tray context menu

use crate::widget::TrayAction;
use muda::{Menu, MenuId, MenuItem, PredefinedMenuItem};
use std::collections::HashMap;

/// Builds the tray menu and maps its item ids back to actions
pub struct MenuManager {
    actions: HashMap<MenuId, TrayAction>,
}

impl MenuManager {
    pub fn new() -> Self {
        Self {
            actions: HashMap::new(),
        }
    }

    /// Build the menu: Open, Toggle autostart, Quit
    pub fn build_menu(&mut self) -> Result<Menu, muda::Error> {
        self.actions.clear();
        let menu = Menu::new();

        let open_item = MenuItem::new("Open", true, None);
        self.actions.insert(open_item.id().clone(), TrayAction::Restore);
        menu.append(&open_item)?;

        let autostart_item = MenuItem::new("Toggle autostart", true, None);
        self.actions
            .insert(autostart_item.id().clone(), TrayAction::ToggleAutostart);
        menu.append(&autostart_item)?;

        menu.append(&PredefinedMenuItem::separator())?;

        let quit_item = MenuItem::new("Quit", true, None);
        self.actions.insert(quit_item.id().clone(), TrayAction::Quit);
        menu.append(&quit_item)?;

        Ok(menu)
    }

    /// Menu id to action table, for the event handler
    pub fn actions(&self) -> &HashMap<MenuId, TrayAction> {
        &self.actions
    }
}

impl Default for MenuManager {
    fn default() -> Self {
        Self::new()
    }
}
