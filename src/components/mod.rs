pub(crate) mod editor;
pub(crate) mod git_panel;
pub(crate) mod shift_click;
pub(crate) mod sortable;
