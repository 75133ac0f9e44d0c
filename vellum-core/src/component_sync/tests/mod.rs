/*
    Integration tests for the component_sync subsystem

    Test suite covering:
    - Forward color/typography propagation
    - Instance/master tree reconciliation (attributes, order, topology)
    - Inverse sync and nested-component touched propagation
    - Round-trip identity of every generated change pair
*/


pub mod inverse_sync_tests;
pub mod roundtrip_tests;
