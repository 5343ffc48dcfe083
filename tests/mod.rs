mod dispatch_flow;
mod google_calendar_mock;
mod smoke_tests;

// This file organizes the integration tests into a cohesive test suite.
// Each module tests a specific aspect of the application:
// - smoke_tests: Basic functionality tests to ensure nothing is broken
// - google_calendar_mock: Mocking the calendar event source for testing
// - dispatch_flow: Intent routing and message log ordering laws
