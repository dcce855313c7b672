mod grid_tests;
