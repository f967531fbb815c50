pub mod alert_list;
pub mod analyze_controls;
pub mod class_select;
pub mod fleet_overview;
pub mod header;
pub mod result_panel;
pub mod settings_panel;
pub mod upload_area;
