// Cross-module coverage lives in unit_tests.rs.
