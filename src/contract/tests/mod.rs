mod contract_program_tests;
