mod annotation_defs_tests;
