// Integration tests module

mod integration {
    mod buffer_test;
    mod config_test;
    mod panel_test;
    mod registry_test;
    mod scaling_test;
    mod stream_test;
}
