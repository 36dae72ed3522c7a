use std::fmt::Display;

/// Capability set derived from the session's role flag. Computed fresh for
/// every gated command, never cached.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Permissions {
    pub can_manage_catalog: bool,
}

/// An action the client can expose for the current session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    SearchProduct,
    ListCategories,
    Logout,
    CreateProduct,
    UpdateProduct,
    DeleteProduct,
    CreateCategory,
    AssignProductToCategory,
}

impl Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Action::SearchProduct => "product search",
            Action::ListCategories => "category list",
            Action::Logout => "logout",
            Action::CreateProduct => "product create",
            Action::UpdateProduct => "product update",
            Action::DeleteProduct => "product delete",
            Action::CreateCategory => "category create",
            Action::AssignProductToCategory => "category assign",
        };
        write!(f, "{}", label)
    }
}

impl Permissions {
    pub fn from_role(is_admin: bool) -> Self {
        Self {
            can_manage_catalog: is_admin,
        }
    }

    /// The actions exposed for this capability set. Pure: same input, same
    /// list, regardless of call order.
    pub fn visible_actions(&self) -> Vec<Action> {
        let mut actions = vec![
            Action::SearchProduct,
            Action::ListCategories,
            Action::Logout,
        ];

        if self.can_manage_catalog {
            actions.extend([
                Action::CreateProduct,
                Action::UpdateProduct,
                Action::DeleteProduct,
                Action::CreateCategory,
                Action::AssignProductToCategory,
            ]);
        }

        actions
    }

    pub fn allows(&self, action: Action) -> bool {
        self.visible_actions().contains(&action)
    }
}
