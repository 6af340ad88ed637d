pub mod prefabs;
pub mod script;
pub mod test_scene;
