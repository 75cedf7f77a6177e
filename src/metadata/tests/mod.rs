mod type_registry_tests;
