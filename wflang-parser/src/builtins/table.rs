//! The builtin table.

use super::{Function, Param};
use crate::object::TypeTag::{self, *};

const ANY: &[TypeTag] = &[Any];
const NUM: &[TypeTag] = &[Number];
const STR: &[TypeTag] = &[String];
const BOOL: &[TypeTag] = &[Boolean];
const DATE: &[TypeTag] = &[Date];
const TIME: &[TypeTag] = &[Time];
const DTTM: &[TypeTag] = &[DateTime];
const DATE_RANGE: &[TypeTag] = &[DateRange];
const INTERVAL: &[TypeTag] = &[Day, Week, Period];
const RANGE: &[TypeTag] = &[Day, Week, Period, DateRange];

const RANGE_PARAM: Param = Param::new(
    "range",
    RANGE,
    "the records to visit, given as an `over` clause with an optional `alias`",
);
const WHERE_PARAM: Param = Param::new(
    "condition",
    BOOL,
    "a `where` clause; only records for which it is true are considered",
)
.optional();
const ORDER_PARAM: Param = Param::new(
    "order",
    ANY,
    "an `order by` clause deciding which record comes first",
)
.optional();
const TOR_FIELD: Param = Param::new("field", STR, "name of the time-off-request field");
const BANK_PARAM: Param = Param::new("bank", STR, "name of the accrual bank");
const AS_OF_PARAM: Param = Param::new(
    "asOf",
    DATE,
    "date to evaluate on; defaults to the calculation date",
)
.optional();
const VALUE_PARAM: Param = Param::new("value", NUM, "the number to round");
const PLACES_PARAM: Param = Param::new("places", NUM, "number of decimal places to keep");
const TEXT_PARAM: Param = Param::new("text", STR, "the string to operate on");

/// A builtin returning a number.
macro_rules! aggregate {
    ($name:expr, $display:expr, $params:expr, $summary:expr $(,)?) => {
        Function {
            name: $name,
            display_name: $display,
            return_type: Number,
            params: $params,
            summary: $summary,
        }
    };
}

const RECORD_EXPRESSION: &[Param] = &[
    RANGE_PARAM,
    Param::new(
        "expression",
        NUM,
        "numeric expression evaluated for each qualifying record",
    ),
    WHERE_PARAM,
];

const RECORD_COUNT: &[Param] = &[RANGE_PARAM, WHERE_PARAM];
const RECORD_FIND: &[Param] = &[RANGE_PARAM, WHERE_PARAM, ORDER_PARAM];
const CONSECUTIVE: &[Param] = &[
    RANGE_PARAM,
    Param::new("condition", BOOL, "the condition each consecutive day must meet"),
];
const DAY_SEARCH: &[Param] = &[
    Param::new("start", DATE, "the day the search starts from"),
    Param::new("condition", BOOL, "the condition the day must meet"),
    Param::new("maxDays", NUM, "give up after this many days").optional(),
];
const ROUNDING: &[Param] = &[VALUE_PARAM, PLACES_PARAM];
const TOR_LOOKUP: &[Param] = &[TOR_FIELD];
const BANK_LOOKUP: &[Param] = &[BANK_PARAM, AS_OF_PARAM];
const CASE_CHANGE: &[Param] = &[TEXT_PARAM];
const PAY_CODE_MAP: &[Param] = &[
    Param::new("payCode", STR, "the pay code to look for"),
    Param::new("mapName", STR, "name of the pay code map"),
];
const LD_LOOKUP: &[Param] = &[
    Param::new("table", STR, "name of the labor distribution table"),
    Param::new("column", STR, "column to match on").pair_first(),
    Param::new("value", ANY, "value the column must equal").pair_second(),
];
const ATTRIBUTE: &[Param] = &[
    Param::new("attribute", STR, "name of the employee attribute"),
    AS_OF_PARAM,
];

pub(super) static FUNCTIONS: &[Function] = &[
    Function {
        name: "if",
        display_name: "if",
        return_type: Any,
        params: &[
            Param::new("condition", BOOL, "the condition to evaluate"),
            Param::new("then", ANY, "the expression to evaluate if the condition is true"),
            Param::new("else", ANY, "the expression to evaluate if the condition is false"),
        ],
        summary: "If expressions comprise a check condition, a consequence and an alternative. \
                  Both `then` and `else` are mandatory, so every If is an If-Else.",
    },
    aggregate!(
        "min",
        "min",
        &[Param::new("args", NUM, "list of numbers to compare").variadic()],
        "Min returns the smallest of its arguments. It takes as many arguments as you like, \
         each any expression that evaluates to a number.",
    ),
    aggregate!(
        "max",
        "max",
        &[Param::new("args", NUM, "list of numbers to compare").variadic()],
        "Max returns the largest of its arguments. It takes as many arguments as you like, \
         each any expression that evaluates to a number.",
    ),
    Function {
        name: "contains",
        display_name: "contains",
        return_type: Boolean,
        params: &[
            Param::new("string1", STR, "the string to search in"),
            Param::new("string2", STR, "the string to search for"),
        ],
        summary: "Contains returns true if `string2` is a substring of `string1`.",
    },
    aggregate!(
        "sum",
        "sum",
        &[
            Param::new("interval", INTERVAL, "the time period to group by"),
            Param::new("range", RANGE, "the time period over which to sum"),
            Param::new("aliasName", STR, "alias for the interval being evaluated").optional(),
            Param::new(
                "expression",
                NUM,
                "this is what will be summed for each qualifying interval",
            ),
            Param::new(
                "condition",
                BOOL,
                "only intervals where this is true are summed; all intervals when omitted",
            )
            .optional(),
        ],
        "Sum calculates the sum of a numeric expression repeatedly over `range`.",
    ),
    aggregate!(
        "count",
        "count",
        &[
            Param::new("interval", INTERVAL, "the time period to group by"),
            Param::new("range", RANGE, "the time period over which to count"),
            Param::new("aliasName", STR, "alias for the interval being evaluated").optional(),
            Param::new("condition", BOOL, "only intervals where this is true are counted"),
        ],
        "Count calculates a total count of qualifying intervals across `range`.",
    ),
    aggregate!(
        "sumtime",
        "sumTime",
        &[
            RANGE_PARAM,
            Param::new(
                "sumExpression",
                NUM,
                "numeric expression summed for each qualifying time slice",
            ),
            WHERE_PARAM,
        ],
        "SumTime calculates the sum of a numeric expression over a range of time records.",
    ),
    aggregate!(
        "counttime",
        "countTime",
        RECORD_COUNT,
        "CountTime counts the time records in a range.",
    ),
    aggregate!(
        "findfirsttime",
        "findFirstTime",
        RECORD_FIND,
        "FindFirstTime finds the first time record in a range that meets the condition.",
    ),
    aggregate!(
        "sumschedule",
        "sumSchedule",
        RECORD_EXPRESSION,
        "SumSchedule calculates the sum of a numeric expression over a range of schedule records.",
    ),
    aggregate!(
        "countschedule",
        "countSchedule",
        RECORD_COUNT,
        "CountSchedule counts the schedule records in a range.",
    ),
    Function {
        name: "findfirstschedule",
        display_name: "findFirstSchedule",
        return_type: ScheduleRecord,
        params: RECORD_FIND,
        summary: "FindFirstSchedule returns the first schedule record in a range that meets the condition.",
    },
    aggregate!(
        "countexception",
        "countException",
        RECORD_COUNT,
        "CountException counts the exceptions raised in a range.",
    ),
    Function {
        name: "findfirsttordetail",
        display_name: "findFirstTorDetail",
        return_type: TorDetailRecord,
        params: RECORD_FIND,
        summary: "FindFirstTorDetail returns the first time-off-request detail in a range that meets the condition.",
    },
    Function {
        name: "findfirstdayforward",
        display_name: "findFirstDayForward",
        return_type: Date,
        params: DAY_SEARCH,
        summary: "FindFirstDayForward walks forward from `start` and returns the first day meeting the condition.",
    },
    Function {
        name: "findfirstdaybackward",
        display_name: "findFirstDayBackward",
        return_type: Date,
        params: DAY_SEARCH,
        summary: "FindFirstDayBackward walks backward from `start` and returns the first day meeting the condition.",
    },
    Function {
        name: "findfirstdeletedtime",
        display_name: "findFirstDeletedTime",
        return_type: Date,
        params: RECORD_COUNT,
        summary: "FindFirstDeletedTime returns the date of the first deleted time record in a range.",
    },
    Function {
        name: "longestconsecutiverange",
        display_name: "longestConsecutiveRange",
        return_type: DateRange,
        params: CONSECUTIVE,
        summary: "LongestConsecutiveRange returns the longest run of consecutive days meeting the condition.",
    },
    Function {
        name: "firstconsecutiveday",
        display_name: "firstConsecutiveDay",
        return_type: Date,
        params: CONSECUTIVE,
        summary: "FirstConsecutiveDay returns the first day of a run of days meeting the condition.",
    },
    Function {
        name: "lastconsecutiveday",
        display_name: "lastConsecutiveDay",
        return_type: Date,
        params: CONSECUTIVE,
        summary: "LastConsecutiveDay returns the last day of a run of days meeting the condition.",
    },
    Function {
        name: "findnthtime",
        display_name: "findNthTime",
        return_type: Time,
        params: &[
            Param::new("n", NUM, "one-based position of the record to return"),
            RANGE_PARAM,
            WHERE_PARAM,
            ORDER_PARAM,
        ],
        summary: "FindNthTime returns the nth time record in a range that meets the condition.",
    },
    aggregate!(
        "accrued",
        "accrued",
        BANK_LOOKUP,
        "Accrued returns the amount accrued into a bank.",
    ),
    aggregate!(
        "balanceaccruedbefore",
        "balanceAccruedBefore",
        &[
            BANK_PARAM,
            Param::new("date", DATE, "accruals on or after this date are ignored"),
        ],
        "BalanceAccruedBefore returns a bank balance counting only accruals before `date`.",
    ),
    aggregate!(
        "balance",
        "balance",
        BANK_LOOKUP,
        "Balance returns the current balance of an accrual bank.",
    ),
    Function {
        name: "callsql",
        display_name: "callSql",
        return_type: ResultSet,
        params: &[
            Param::new("query", STR, "name of the registered SQL query"),
            Param::new("args", ANY, "query arguments, in order").variadic(),
        ],
        summary: "CallSql runs a registered SQL query and returns its result set.",
    },
    Function {
        name: "convertdttmbytimezone",
        display_name: "convertDttmByTimezone",
        return_type: DateTime,
        params: &[
            Param::new("dateTime", DTTM, "the date-time to convert"),
            Param::new("fromZone", STR, "time zone the value is expressed in"),
            Param::new("toZone", STR, "time zone to convert into"),
        ],
        summary: "ConvertDttmByTimezone converts a date-time between two time zones.",
    },
    aggregate!(
        "countgroupcalc",
        "countGroupCalc",
        &[
            Param::new("groupName", STR, "name of the calculation group"),
            RANGE_PARAM,
        ],
        "CountGroupCalc counts the members of a calculation group.",
    ),
    aggregate!(
        "countholidays",
        "countHolidays",
        &[
            Param::new("range", DATE_RANGE, "the dates to check"),
            Param::new("calendar", STR, "holiday calendar; the employee's when omitted").optional(),
        ],
        "CountHolidays counts the holidays falling within a date range.",
    ),
    Function {
        name: "getholiday",
        display_name: "getHoliday",
        return_type: String,
        params: &[
            Param::new("date", DATE, "the date to check"),
            Param::new("calendar", STR, "holiday calendar; the employee's when omitted").optional(),
        ],
        summary: "GetHoliday returns the name of the holiday on a date, or null.",
    },
    aggregate!(
        "counthomecrewmembers",
        "countHomeCrewMembers",
        &[Param::new("date", DATE, "the day to count crew members on")],
        "CountHomeCrewMembers counts the members of the employee's home crew.",
    ),
    aggregate!(
        "countshiftchanges",
        "countShiftChanges",
        RECORD_COUNT,
        "CountShiftChanges counts schedule shift changes in a range.",
    ),
    Function {
        name: "employee_attribute_exists",
        display_name: "employee_attribute_exists",
        return_type: Boolean,
        params: ATTRIBUTE,
        summary: "Returns true when the employee has a value for the attribute.",
    },
    Function {
        name: "employee_attribute",
        display_name: "employee_attribute",
        return_type: EmployeeAttribute,
        params: ATTRIBUTE,
        summary: "Returns the value of an employee attribute.",
    },
    Function {
        name: "getattributecalculationdate",
        display_name: "getAttributeCalculationDate",
        return_type: Date,
        params: &[],
        summary: "GetAttributeCalculationDate returns the date attributes are being calculated for.",
    },
    Function {
        name: "getbooleanfieldfromtor",
        display_name: "getBooleanFieldFromTor",
        return_type: Boolean,
        params: TOR_LOOKUP,
        summary: "Reads a boolean field from the current time-off request.",
    },
    Function {
        name: "getdatefieldfromtor",
        display_name: "getDateFieldFromTor",
        return_type: Date,
        params: TOR_LOOKUP,
        summary: "Reads a date field from the current time-off request.",
    },
    Function {
        name: "getnumberfieldfromtor",
        display_name: "getNumberFieldFromTor",
        return_type: Number,
        params: TOR_LOOKUP,
        summary: "Reads a number field from the current time-off request.",
    },
    Function {
        name: "getpaycurrencycode",
        display_name: "getPayCurrencyCode",
        return_type: String,
        params: &[],
        summary: "GetPayCurrencyCode returns the employee's pay currency code.",
    },
    Function {
        name: "getselectfieldvaluefromtor",
        display_name: "getSelectFieldValueFromTor",
        return_type: String,
        params: TOR_LOOKUP,
        summary: "Reads the selected value of a select field from the current time-off request.",
    },
    Function {
        name: "getstringfieldfromtor",
        display_name: "getStringFieldFromTor",
        return_type: String,
        params: TOR_LOOKUP,
        summary: "Reads a string field from the current time-off request.",
    },
    Function {
        name: "getsysdatebytimezone",
        display_name: "getSysDateByTimezone",
        return_type: Date,
        params: &[Param::new("timezone", STR, "the time zone to read the system date in")],
        summary: "GetSysDateByTimezone returns today's date in a time zone.",
    },
    Function {
        name: "ldlookup",
        display_name: "ldLookup",
        return_type: LdRecord,
        params: LD_LOOKUP,
        summary: "LdLookup finds the labor distribution record matching every column/value pair.",
    },
    Function {
        name: "ldvalidate",
        display_name: "ldValidate",
        return_type: Boolean,
        params: LD_LOOKUP,
        summary: "LdValidate returns true when a labor distribution record matches every column/value pair.",
    },
    aggregate!(
        "indexof",
        "indexOf",
        &[
            TEXT_PARAM,
            Param::new("search", STR, "the substring to find"),
        ],
        "IndexOf returns the zero-based position of `search` in `text`, or -1.",
    ),
    aggregate!(
        "lengthofservice",
        "lengthOfService",
        &[
            Param::new("unit", STR, "one of \"days\", \"months\" or \"years\""),
            AS_OF_PARAM,
        ],
        "LengthOfService returns how long the employee has been employed.",
    ),
    Function {
        name: "makedate",
        display_name: "makeDate",
        return_type: Date,
        params: &[
            Param::new("year", NUM, "four-digit year"),
            Param::new("month", NUM, "month, 1 to 12"),
            Param::new("day", NUM, "day of month"),
        ],
        summary: "MakeDate builds a date from its parts.",
    },
    Function {
        name: "makedatetime",
        display_name: "makeDateTime",
        return_type: DateTime,
        params: &[
            Param::new("date", DATE, "the date part"),
            Param::new("time", TIME, "the time part"),
        ],
        summary: "MakeDateTime combines a date and a time.",
    },
    Function {
        name: "makedatetimerange",
        display_name: "makeDateTimeRange",
        return_type: DateTimeRange,
        params: &[
            Param::new("start", DTTM, "start of the range"),
            Param::new("end", DTTM, "end of the range"),
        ],
        summary: "MakeDateTimeRange builds a range between two date-times.",
    },
    Function {
        name: "paycodeinschedulemap",
        display_name: "payCodeInScheduleMap",
        return_type: Boolean,
        params: PAY_CODE_MAP,
        summary: "Returns true when the pay code belongs to the schedule pay code map.",
    },
    Function {
        name: "paycodeintimesheetmap",
        display_name: "payCodeInTimeSheetMap",
        return_type: Boolean,
        params: PAY_CODE_MAP,
        summary: "Returns true when the pay code belongs to the timesheet pay code map.",
    },
    aggregate!(
        "rangelookup",
        "rangeLookup",
        &[
            Param::new("table", STR, "name of the range table"),
            Param::new("value", NUM, "the value to locate in the table's ranges"),
        ],
        "RangeLookup returns the result of the range containing `value`.",
    ),
    aggregate!("round", "round", ROUNDING, "Round rounds half away from zero."),
    aggregate!("roundup", "roundUp", ROUNDING, "RoundUp rounds away from zero."),
    aggregate!("rounddown", "roundDown", ROUNDING, "RoundDown rounds toward zero."),
    aggregate!(
        "roundtoint",
        "roundToInt",
        &[VALUE_PARAM],
        "RoundToInt rounds to the nearest whole number.",
    ),
    Function {
        name: "semimonthlyperiod",
        display_name: "semiMonthlyPeriod",
        return_type: Period,
        params: &[
            Param::new("date", DATE, "a date inside the wanted period"),
            Param::new("splitDay", NUM, "last day of the first half; 15 when omitted").optional(),
        ],
        summary: "SemiMonthlyPeriod returns the half-month period containing `date`.",
    },
    Function {
        name: "substr",
        display_name: "substr",
        return_type: String,
        params: &[
            TEXT_PARAM,
            Param::new("start", NUM, "zero-based start position"),
            Param::new("length", NUM, "number of characters; to the end when omitted").optional(),
        ],
        summary: "Substr returns part of a string.",
    },
    Function {
        name: "tolowercase",
        display_name: "toLowerCase",
        return_type: String,
        params: CASE_CHANGE,
        summary: "ToLowerCase converts a string to lower case.",
    },
    Function {
        name: "touppercase",
        display_name: "toUpperCase",
        return_type: String,
        params: CASE_CHANGE,
        summary: "ToUpperCase converts a string to upper case.",
    },
    aggregate!(
        "minschedule",
        "minSchedule",
        RECORD_EXPRESSION,
        "MinSchedule returns the smallest value of an expression over schedule records.",
    ),
    aggregate!(
        "maxschedule",
        "maxSchedule",
        RECORD_EXPRESSION,
        "MaxSchedule returns the largest value of an expression over schedule records.",
    ),
    aggregate!(
        "avgschedule",
        "avgSchedule",
        RECORD_EXPRESSION,
        "AvgSchedule returns the average value of an expression over schedule records.",
    ),
    aggregate!(
        "mintime",
        "minTime",
        RECORD_EXPRESSION,
        "MinTime returns the smallest value of an expression over time records.",
    ),
    aggregate!(
        "maxtime",
        "maxTime",
        RECORD_EXPRESSION,
        "MaxTime returns the largest value of an expression over time records.",
    ),
    aggregate!(
        "avgtime",
        "avgTime",
        RECORD_EXPRESSION,
        "AvgTime returns the average value of an expression over time records.",
    ),
    aggregate!(
        "sumexception",
        "sumException",
        RECORD_EXPRESSION,
        "SumException calculates the sum of a numeric expression over exceptions.",
    ),
    aggregate!(
        "minexception",
        "minException",
        RECORD_EXPRESSION,
        "MinException returns the smallest value of an expression over exceptions.",
    ),
    aggregate!(
        "maxexception",
        "maxException",
        RECORD_EXPRESSION,
        "MaxException returns the largest value of an expression over exceptions.",
    ),
    aggregate!(
        "averageexception",
        "averageException",
        RECORD_EXPRESSION,
        "AverageException returns the average value of an expression over exceptions.",
    ),
];
