/// Commands reachable from the menu bar. Keyboard shortcuts in normal mode
/// resolve to the same commands.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub(crate) enum MenuAction {
    AddStudent,
    Refresh,
    Quit,
    Search,
    EditRecord,
    DeleteRecord,
    About,
}

/// One top-level menu: its title and the items it drops down.
pub(crate) struct Menu {
    pub(crate) title: &'static str,
    pub(crate) items: &'static [(&'static str, MenuAction)],
}

pub(crate) const MENUS: &[Menu] = &[
    Menu {
        title: "File",
        items: &[
            ("Add Student", MenuAction::AddStudent),
            ("Refresh", MenuAction::Refresh),
            ("Quit", MenuAction::Quit),
        ],
    },
    Menu {
        title: "Edit",
        items: &[
            ("Search", MenuAction::Search),
            ("Edit Record", MenuAction::EditRecord),
            ("Delete Record", MenuAction::DeleteRecord),
        ],
    },
    Menu {
        title: "Help",
        items: &[("About", MenuAction::About)],
    },
];

/// Which menu is open and which of its items is highlighted.
#[derive(Copy, Clone, Default, Debug, PartialEq, Eq)]
pub(crate) struct MenuState {
    pub(crate) menu: usize,
    pub(crate) item: usize,
}

impl MenuState {
    /// Switch to a neighbouring menu, wrapping around, and reset the item.
    pub(crate) fn move_menu(&mut self, delta: isize) {
        let len = MENUS.len() as isize;
        self.menu = (self.menu as isize + delta).rem_euclid(len) as usize;
        self.item = 0;
    }

    pub(crate) fn move_item(&mut self, delta: isize) {
        let len = self.current().items.len() as isize;
        self.item = (self.item as isize + delta).rem_euclid(len) as usize;
    }

    pub(crate) fn current(&self) -> &'static Menu {
        &MENUS[self.menu]
    }

    pub(crate) fn action(&self) -> MenuAction {
        self.current().items[self.item].1
    }
}
