mod print_tests;
