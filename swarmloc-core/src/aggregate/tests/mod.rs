mod stats_tests;
